use tokio_tungstenite::connect_async;
use url::Url;

pub const BINANCE_FUTURES_WS: &str = "wss://fstream.binance.com/ws/";

pub async fn connect_websocket(
    url: &str,
) -> Result<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    Box<dyn std::error::Error + Send + Sync>,
> {
    let url = Url::parse(url)?;
    let (ws_stream, _) = connect_async(url).await?;
    Ok(ws_stream)
}
