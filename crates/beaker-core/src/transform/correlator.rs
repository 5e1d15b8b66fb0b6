//! Merging transitions that share a path and method into one endpoint.
//!
//! API Blueprint lets several actions of one resource describe the same
//! request, e.g. one action per response media type. The client exposes
//! them as a single operation whose response is one of the declared
//! variants.

use indexmap::{IndexMap, IndexSet};

use crate::parse::resource::{Resource, Transition};
use crate::parse::transaction::{HttpMethod, Request, Response};

/// The transactions of one resource that share an effective href and method.
#[derive(Debug, Clone)]
pub struct Correlation<'a> {
    /// The first matching transition, in declaration order. Its title, copy
    /// and variables describe the endpoint.
    pub owner: &'a Transition,
    /// The owner's first matching request.
    pub request: &'a Request,
    /// Response variants in first-seen order.
    pub responses: Vec<&'a Response>,
}

/// `request.href`, else `transition.href`, else `resource.href`.
pub fn effective_href<'a>(
    resource: &'a Resource,
    transition: &'a Transition,
    request: &'a Request,
) -> &'a str {
    request
        .href
        .as_deref()
        .or(transition.href.as_deref())
        .unwrap_or(&resource.href)
}

/// Distinct (href, method) pairs declared on a resource, in first-seen order.
pub fn endpoint_keys(resource: &Resource) -> Vec<(String, HttpMethod)> {
    let mut keys: IndexSet<(String, HttpMethod)> = IndexSet::new();
    for transition in &resource.transitions {
        for tx in &transition.transactions {
            match &tx.request {
                Some(request) => {
                    let href = effective_href(resource, transition, request);
                    keys.insert((href.to_string(), request.method));
                }
                None => log::warn!(
                    "skipping transaction without a request in `{}`",
                    transition.title.as_deref().unwrap_or(&resource.href)
                ),
            }
        }
    }
    keys.into_iter().collect()
}

/// Collect every response of every transaction of `resource` whose request
/// matches `href` and `method`.
///
/// Variants are keyed by (status code, content type). Unless
/// `keep_duplicates` is set, a later response repeating a key is dropped
/// with a warning. Returns `None` when nothing matches.
pub fn correlate<'a>(
    resource: &'a Resource,
    href: &str,
    method: HttpMethod,
    keep_duplicates: bool,
) -> Option<Correlation<'a>> {
    let mut owner: Option<(&Transition, &Request)> = None;
    let mut responses: Vec<&Response> = Vec::new();
    let mut seen: IndexMap<(u16, Option<&str>), usize> = IndexMap::new();

    for transition in &resource.transitions {
        for tx in &transition.transactions {
            let Some(request) = &tx.request else {
                continue;
            };
            if request.method != method || effective_href(resource, transition, request) != href {
                continue;
            }
            if owner.is_none() {
                owner = Some((transition, request));
            }

            for response in &tx.responses {
                let key = (response.status_code, response.content_type());
                if let Some(first) = seen.get(&key) {
                    if !keep_duplicates {
                        log::warn!(
                            "{method} {href}: dropping duplicate response {} {}, keeping variant #{first}",
                            response.status_code,
                            response.content_type().unwrap_or("(no content type)"),
                        );
                        continue;
                    }
                } else {
                    seen.insert(key, responses.len());
                }
                responses.push(response);
            }
        }
    }

    owner.map(|(owner, request)| Correlation {
        owner,
        request,
        responses,
    })
}
