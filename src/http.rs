//! Request and response values exchanged between the client and hooks.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single HTTP header. Order and duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a `Name: value` line as typed on the command line.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidRequest(format!("header '{line}' is missing ':'")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "header '{line}' has an empty name"
            )));
        }
        Ok(Self::new(name, value.trim()))
    }
}

/// An outgoing request as seen by `BeforeRequest` hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Values of every header named `name` (case-insensitive), in order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        header_values(&self.headers, name)
    }
}

/// A received response as seen by `AfterResponse` hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<Header>,
    pub text: String,
}

impl Response {
    pub fn new(status_code: u16, text: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: Vec::new(),
            text: text.into(),
        }
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        header_values(&self.headers, name)
    }
}

fn header_values<'a>(headers: &'a [Header], name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    headers
        .iter()
        .filter(move |h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}
