use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use anyhow::Result;
use embedded_hal::delay::DelayNs;

use crate::limit_switch::{LimitSensor, LimitSwitchState};
use crate::motion::{Command, MotionExecutor};
use crate::motor::{Motor, Speed};

#[derive(Debug, PartialEq, Eq)]
pub enum Request {
    Status,
    Command(String),
    /// Anything but GET or POST; gets no reply.
    Unsupported(String),
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Lenient `Content-Length` parsing: leading digits only, garbage counts as 0.
fn content_length(line: &str) -> Option<usize> {
    const NAME: &str = "Content-Length:";
    let name = line.get(..NAME.len())?;
    if !name.eq_ignore_ascii_case(NAME) {
        return None;
    }
    let value = line[NAME.len()..].trim_start();
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    Some(value[..end].parse().unwrap_or(0))
}

/// Consume headers up to the blank line, returning the declared body length.
fn read_headers<R: BufRead>(reader: &mut R) -> Result<usize> {
    let mut length = 0;
    loop {
        let line = read_line(reader)?;
        if line.is_empty() {
            return Ok(length);
        }
        if let Some(declared) = content_length(&line) {
            length = declared;
        }
    }
}

pub fn read_request<R: BufRead>(reader: &mut R, max_body: usize) -> Result<Request> {
    let request_line = read_line(reader)?;

    if request_line.starts_with("GET") {
        read_headers(reader)?;
        Ok(Request::Status)
    } else if request_line.starts_with("POST") {
        let declared = read_headers(reader)?;
        if declared > max_body {
            log::warn!("Request body of {} bytes truncated to {}", declared, max_body);
        }
        let mut body = Vec::new();
        reader
            .by_ref()
            .take(declared.min(max_body) as u64)
            .read_to_end(&mut body)?;
        if declared > max_body {
            // Unread input makes the close reset the connection and lose the reply
            let mut rest = reader.by_ref().take((declared - max_body) as u64);
            if let Err(e) = io::copy(&mut rest, &mut io::sink()) {
                log::warn!("Failed to drain request body: {}", e);
            }
        }
        Ok(Request::Command(String::from_utf8_lossy(&body).into_owned()))
    } else {
        Ok(Request::Unsupported(request_line))
    }
}

pub fn render_status(switches: &LimitSwitchState, speed: Speed) -> String {
    format!(
        "<html><head><title>ESP32 Web Server</title></head><body><h1>ESP32 Web Server</h1>\
         <div>Upper Right: {}</div>\
         <div>Lower Right: {}</div>\
         <div>Upper Left: {}</div>\
         <div>Lower Left: {}</div>\
         <div>Speed: {}</div>\
         </body></html>",
        switches.upper_right as u8,
        switches.lower_right as u8,
        switches.upper_left as u8,
        switches.lower_left as u8,
        speed,
    )
}

pub fn write_response<W: Write>(writer: &mut W, body: &str) -> Result<()> {
    write!(
        writer,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html\r\n\
         Content-Length: {}\r\n\
         Connection: Closed\r\n\
         \r\n\
         {}",
        body.len(),
        body,
    )?;
    writer.flush()?;
    Ok(())
}

/// Serve a single request. A POST is run to completion before it is answered.
pub fn handle_connection<S, M, L, D>(
    stream: &mut S,
    executor: &mut MotionExecutor<M, L>,
    delay: &mut D,
) -> Result<()>
where
    S: Read + Write,
    M: Motor,
    L: LimitSensor,
    D: DelayNs,
{
    let max_body = executor.config().max_request_body;
    let request = read_request(&mut BufReader::new(&mut *stream), max_body)?;

    match request {
        Request::Status => {
            let switches = executor.read_switches()?;
            let html = render_status(&switches, executor.current_speed());
            write_response(stream, &html)?;
        }
        Request::Command(token) => {
            log::debug!("Command: {}", token);
            executor.execute(Command::parse(&token), delay)?;
            write_response(stream, &format!("received POST request {}", token))?;
        }
        Request::Unsupported(line) => {
            log::warn!("Unsupported request: {}", line);
        }
    }
    Ok(())
}

/// Serve one accepted socket, bounding every read by the configured timeout.
pub fn handle_stream<M, L, D>(
    mut stream: TcpStream,
    executor: &mut MotionExecutor<M, L>,
    delay: &mut D,
) -> Result<()>
where
    M: Motor,
    L: LimitSensor,
    D: DelayNs,
{
    let timeout = Duration::from_millis(executor.config().read_timeout_ms.max(1));
    stream.set_read_timeout(Some(timeout))?;
    handle_connection(&mut stream, executor, delay)
}

/// Accept loop. Connections are handled one at a time and closed afterwards.
pub fn serve<M, L, D>(
    listener: TcpListener,
    executor: &mut MotionExecutor<M, L>,
    delay: &mut D,
) -> Result<()>
where
    M: Motor,
    L: LimitSensor,
    D: DelayNs,
{
    log::info!("HTTP server listening on {}", listener.local_addr()?);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = handle_stream(stream, executor, delay) {
                    log::error!("Failed to handle request: {}", e);
                }
            }
            Err(e) => log::error!("Failed to accept connection: {}", e),
        }
    }
    Ok(())
}
