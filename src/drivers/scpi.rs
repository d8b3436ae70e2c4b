use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use log::{debug, trace};
use crate::drivers::DriverError;
/// Line-oriented SCPI command channel.
pub trait Commander {
    fn connect(&mut self) -> Result<(), DriverError>;
    fn disconnect(&mut self) -> Result<(), DriverError>;
    fn is_connected(&self) -> bool;
    fn send(&mut self, command: &str) -> Result<(), DriverError>;
    fn query(&mut self, command: &str) -> Result<String, DriverError>;
}
/// SCPI over a raw TCP socket, commands terminated by CRLF.
pub struct TcpCommander {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<BufReader<TcpStream>>,
}
impl TcpCommander {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            stream: None,
        }
    }
    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    fn stream(&mut self) -> Result<&mut BufReader<TcpStream>, DriverError> {
        self.stream
            .as_mut()
            .ok_or(DriverError::Closed("scpi connection"))
    }
}
impl Commander for TcpCommander {
    fn connect(&mut self) -> Result<(), DriverError> {
        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| DriverError::Protocol(format!("cannot resolve {}", self.host)))?;
        let stream = TcpStream::connect_timeout(&addr, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        debug!("connected to {}:{}", self.host, self.port);
        self.stream = Some(BufReader::new(stream));
        Ok(())
    }
    fn disconnect(&mut self) -> Result<(), DriverError> {
        if self.stream.take().is_some() {
            debug!("disconnected from {}:{}", self.host, self.port);
        }
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
    fn send(&mut self, command: &str) -> Result<(), DriverError> {
        trace!("> {command}");
        let stream = self.stream()?.get_mut();
        stream.write_all(command.as_bytes())?;
        stream.write_all(b"\r\n")?;
        Ok(())
    }
    fn query(&mut self, command: &str) -> Result<String, DriverError> {
        self.send(command)?;
        let mut line = String::new();
        if self.stream()?.read_line(&mut line)? == 0 {
            return Err(DriverError::Protocol(format!(
                "connection closed while waiting for reply to {command}"
            )));
        }
        let reply = line.trim_end_matches(['\r', '\n']).to_owned();
        trace!("< {} bytes", reply.len());
        Ok(reply)
    }
}
/// Test double: records every command and answers queries from a script.
#[derive(Debug, Default)]
pub struct ScriptedCommander {
    connected: bool,
    replies: VecDeque<String>,
    pub sent: Vec<String>,
}
impl ScriptedCommander {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}
impl Commander for ScriptedCommander {
    fn connect(&mut self) -> Result<(), DriverError> {
        self.connected = true;
        Ok(())
    }
    fn disconnect(&mut self) -> Result<(), DriverError> {
        self.connected = false;
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
    fn send(&mut self, command: &str) -> Result<(), DriverError> {
        if !self.connected {
            return Err(DriverError::Closed("scripted connection"));
        }
        self.sent.push(command.to_owned());
        Ok(())
    }
    fn query(&mut self, command: &str) -> Result<String, DriverError> {
        self.send(command)?;
        self.replies
            .pop_front()
            .ok_or_else(|| DriverError::Protocol(format!("no scripted reply for {command}")))
    }
}
/// Parse a `{v1,v2,...}` data block.
pub fn parse_data_block(reply: &str) -> Result<Vec<f64>, DriverError> {
    let body = reply
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| DriverError::Protocol(format!("malformed data block: {reply:.32}")))?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| DriverError::Protocol(format!("bad value {value:?}: {e}")))
        })
        .collect()
}
