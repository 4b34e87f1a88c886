use balise::{
    client::Client,
    define_api,
    server::{Handler, Response, Server, ServerRequest},
    Address, BoxError, Error,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pong;

define_api! {
    mod calc_message;
    pub enum CalcRequest {
        Ping => Pong,
        Div(i64, i64) => i64,
    }
}

#[derive(Clone)]
struct Calculator;

impl Handler<CalcRequest> for Calculator {
    fn handle(
        &self,
        _addr: &SocketAddr,
        req: CalcRequest,
    ) -> BoxFuture<'_, Result<Response, BoxError>> {
        Box::pin(async move {
            match req {
                CalcRequest::Ping(params) => params.response(Pong),
                CalcRequest::Div(params) => {
                    let quotient = params
                        .0
                        .checked_div(params.1)
                        .ok_or("division by zero")?;
                    params.response(quotient)
                }
            }
        })
    }
}

async fn start_server() -> Address {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().into();
    tokio::spawn(async move { Server::new(Calculator).serve(&listener).await });
    addr
}

#[tokio::test]
async fn requests_share_one_connection() {
    let addr = start_server().await;
    let mut client = Client::<CalcRequest>::new(addr);

    assert_eq!(client.send_request(calc_message::Ping).await.unwrap(), Pong);
    assert_eq!(client.send_request(calc_message::Div(9, 3)).await.unwrap(), 3);
}

#[tokio::test]
async fn handler_errors_reach_the_client() {
    let addr = start_server().await;
    let mut client = Client::<CalcRequest>::new(addr);

    match client.send_request(calc_message::Div(1, 0)).await {
        Err(Error::Server(msg)) => assert_eq!(msg, "division by zero"),
        other => panic!("unexpected result: {:?}", other),
    }

    // the connection is still usable afterwards
    assert_eq!(client.send_request(calc_message::Div(8, 2)).await.unwrap(), 4);
}
