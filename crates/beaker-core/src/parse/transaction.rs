use std::fmt;

use crate::element::{Element, NodePath};
use crate::error::DecodeError;

use super::data_structure::DataStructure;
use super::member::Headers;
use super::scalar::Asset;
use super::{TypedElement, collect_copy, element_attribute, kind, text_attribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Children shared by requests and responses.
#[derive(Debug, Clone, Default, PartialEq)]
struct MessageBody {
    copy: Option<String>,
    data_structure: Option<DataStructure>,
    assets: Vec<Asset>,
}

impl MessageBody {
    fn decode(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut body = MessageBody {
            copy: collect_copy(element, path)?,
            ..MessageBody::default()
        };
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::DATA_STRUCTURE => {
                    if body.data_structure.is_some() {
                        return Err(DecodeError::NotSupported {
                            construct: "more than one data structure in a message".to_string(),
                            path: child_path,
                        });
                    }
                    body.data_structure = Some(DataStructure::decode(child, &child_path)?);
                }
                kind::ASSET => body.assets.push(Asset::decode(child, &child_path)?),
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in message at {child_path}"),
            }
        }
        Ok(body)
    }
}

/// An `httpRequest` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    /// Overrides the href of the enclosing transition.
    pub href: Option<String>,
    pub title: Option<String>,
    pub copy: Option<String>,
    pub headers: Headers,
    pub data_structure: Option<DataStructure>,
    pub assets: Vec<Asset>,
}

impl Request {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }
}

impl TypedElement for Request {
    const KIND: &'static str = kind::HTTP_REQUEST;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let raw_method =
            text_attribute(element, "method", path)?.ok_or_else(|| DecodeError::MissingField {
                field: "method",
                path: path.attribute("method"),
            })?;
        let method = HttpMethod::parse(&raw_method).ok_or_else(|| DecodeError::MalformedScalar {
            field: "method",
            raw: raw_method.clone(),
            path: path.attribute("method"),
        })?;
        let body = MessageBody::decode(element, path)?;

        Ok(Request {
            method,
            href: text_attribute(element, "href", path)?,
            title: element.title().map(String::from),
            copy: body.copy,
            headers: element_attribute(element, "headers", path)?.unwrap_or_default(),
            data_structure: body.data_structure,
            assets: body.assets,
        })
    }
}

/// An `httpResponse` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub copy: Option<String>,
    pub headers: Headers,
    pub data_structure: Option<DataStructure>,
    pub assets: Vec<Asset>,
}

impl Response {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.content_type()
    }
}

impl TypedElement for Response {
    const KIND: &'static str = kind::HTTP_RESPONSE;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let raw_status = text_attribute(element, "statusCode", path)?.ok_or_else(|| {
            DecodeError::MissingField {
                field: "statusCode",
                path: path.attribute("statusCode"),
            }
        })?;
        let status_code =
            raw_status
                .trim()
                .parse::<u16>()
                .map_err(|_| DecodeError::MalformedScalar {
                    field: "statusCode",
                    raw: raw_status.clone(),
                    path: path.attribute("statusCode"),
                })?;
        let body = MessageBody::decode(element, path)?;

        Ok(Response {
            status_code,
            copy: body.copy,
            headers: element_attribute(element, "headers", path)?.unwrap_or_default(),
            data_structure: body.data_structure,
            assets: body.assets,
        })
    }
}

/// An `httpTransaction`: at most one request paired with its responses.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub copy: Option<String>,
    pub request: Option<Request>,
    pub responses: Vec<Response>,
}

impl TypedElement for Transaction {
    const KIND: &'static str = kind::HTTP_TRANSACTION;

    fn decode_content(element: &Element, path: &NodePath) -> Result<Self, DecodeError> {
        let mut request = None;
        let mut responses = Vec::new();
        for (i, child) in element.children().iter().enumerate() {
            let child_path = path.child(i);
            match child.kind() {
                kind::HTTP_REQUEST => {
                    if request.is_some() {
                        return Err(DecodeError::NotSupported {
                            construct: "more than one request per transaction".to_string(),
                            path: child_path,
                        });
                    }
                    request = Some(Request::decode(child, &child_path)?);
                }
                kind::HTTP_RESPONSE => responses.push(Response::decode(child, &child_path)?),
                kind::COPY => {}
                other => log::debug!("ignoring `{other}` element in transaction at {child_path}"),
            }
        }
        Ok(Transaction {
            copy: collect_copy(element, path)?,
            request,
            responses,
        })
    }
}
