use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;

use crate::configuration::run_configuration::RunConfiguration;
use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::ConnectionError;
use crate::http::message_framing::is_response_complete;
use crate::http::request_spec::RequestSpec;
use crate::logging::syslog::{debug, trace};

const READ_BUFFER_SIZE: usize = 8192;

#[derive(Clone, Debug)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub bind_address: Option<IpAddr>,
}

impl TransportOptions {
    pub fn from_configuration(configuration: &RunConfiguration) -> Self {
        let bind_address = if configuration.bind_client_address { configuration.client_ip.parse().ok() } else { None };
        TransportOptions {
            connect_timeout: configuration.connect_timeout(),
            read_timeout: configuration.read_timeout(),
            bind_address,
        }
    }
}

/// The bytes one request produced, plus how long the exchange took.
#[derive(Clone, Debug)]
pub struct RawExchange {
    pub bytes: Vec<u8>,
    pub elapsed: Duration,
}

/// Send one request over a fresh connection and read back everything the server answers.
///
/// The socket lives only inside this call and is closed on every return path.
/// A timeout on connect or read is an error; a partial response is never returned.
pub async fn send(host: &str, port: u16, request: &RequestSpec, options: &TransportOptions) -> Result<RawExchange, AssertionError> {
    let started = Instant::now();
    let target = format!("{}:{}", host, port);

    let mut stream = match timeout(options.connect_timeout, connect(host, port, options.bind_address)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(AssertionError::connection(
                ConnectionError::ConnectTimeout,
                format!("Connecting to {} timed out after {} ms", target, options.connect_timeout.as_millis()),
            ));
        }
    };
    trace(format!("Connected to {}, sending {:?}", target, request.request_line()));

    let wire = request.to_wire_bytes();
    let write_error = match write_request(&mut stream, &wire).await {
        Ok(()) => None,
        Err(e) => {
            // Servers may answer and close before reading the whole request; try to read the answer anyway
            debug(format!("Writing request to {} failed, reading any response: {}", target, e));
            Some(e)
        }
    };

    let bytes = match timeout(options.read_timeout, read_response(&mut stream, request.is_head())).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(AssertionError::connection(
                ConnectionError::ReadTimeout,
                format!("No complete response from {} within {} ms", target, options.read_timeout.as_millis()),
            ));
        }
    };

    if bytes.is_empty() {
        if let Some(e) = write_error {
            return Err(AssertionError::from_io(&e, &format!("Failed to send request to {}", target)));
        }
    }

    let elapsed = started.elapsed();
    trace(format!("Received {} bytes from {} in {} ms", bytes.len(), target, elapsed.as_millis()));
    Ok(RawExchange { bytes, elapsed })
}

async fn connect(host: &str, port: u16, bind_address: Option<IpAddr>) -> Result<TcpStream, AssertionError> {
    let target = format!("{}:{}", host, port);
    let addresses: Vec<SocketAddr> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| AssertionError::from_io(&e, &format!("Failed to resolve {}", target)))?
        .collect();

    let Some(bind_ip) = bind_address else {
        let mut last_error = None;
        for address in &addresses {
            match TcpStream::connect(address).await {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        return Err(match last_error {
            Some(e) => AssertionError::from_io(&e, &format!("Failed to connect to {}", target)),
            None => AssertionError::connection(ConnectionError::Io, format!("No addresses found for {}", target)),
        });
    };

    let address = addresses
        .iter()
        .find(|a| a.is_ipv4() == bind_ip.is_ipv4())
        .copied()
        .ok_or_else(|| AssertionError::connection(ConnectionError::Io, format!("No address of {} matches the client address {}", target, bind_ip)))?;

    let socket = (if bind_ip.is_ipv4() { TcpSocket::new_v4() } else { TcpSocket::new_v6() }).map_err(|e| AssertionError::from_io(&e, "Failed to create socket"))?;
    socket
        .bind(SocketAddr::new(bind_ip, 0))
        .map_err(|e| AssertionError::from_io(&e, &format!("Failed to bind client address {}", bind_ip)))?;
    socket.connect(address).await.map_err(|e| AssertionError::from_io(&e, &format!("Failed to connect to {}", target)))
}

async fn write_request(stream: &mut TcpStream, wire: &[u8]) -> Result<(), std::io::Error> {
    if !wire.is_empty() {
        stream.write_all(wire).await?;
    }
    stream.flush().await
}

async fn read_response(stream: &mut TcpStream, is_head_request: bool) -> Result<Vec<u8>, AssertionError> {
    let mut response = Vec::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        match stream.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => {
                response.extend_from_slice(&buffer[..n]);
                if is_response_complete(&response, is_head_request) {
                    break;
                }
            }
            Err(e) if !response.is_empty() && matches!(e.kind(), std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted) => {
                // The server reset the connection after sending its answer
                debug(format!("Connection reset after {} response bytes: {}", response.len(), e));
                break;
            }
            Err(e) => return Err(AssertionError::from_io(&e, "Failed to read response")),
        }
    }

    Ok(response)
}
