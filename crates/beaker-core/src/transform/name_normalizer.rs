use heck::{ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
        screaming_snake: sanitized.to_shouty_snake_case(),
    }
}

/// Name of a response variant, e.g. `http200_application_json`.
pub fn response_variant_name(status_code: u16, content_type: Option<&str>) -> String {
    match content_type {
        Some(ct) => format!("http{status_code}_{}", ct.replace('/', "_")),
        None => format!("http{status_code}"),
    }
}

/// Derive a camelCase endpoint name from HTTP method + URI template.
///
/// Query expressions (`{?limit}`, `{&page}`) are ignored.
///
/// Examples:
/// - `GET /coupons` → `listCoupons`
/// - `POST /coupons` → `createCoupons`
/// - `GET /coupons/{id}` → `getCoupon`
/// - `GET /questions/{id}/choices{?limit}` → `listQuestionsChoices`
pub fn route_to_name(method: &str, href: &str) -> String {
    let path = strip_query_expressions(href);
    let is_param = |seg: &&str| seg.starts_with('{') && seg.ends_with('}');
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let single = segments.last().is_some_and(is_param);
    let literals: Vec<&str> = segments.into_iter().filter(|s| !is_param(s)).collect();

    let prefix = match method.to_ascii_uppercase().as_str() {
        "GET" if single => "get",
        "GET" => "list",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        "PATCH" => "patch",
        _ => "call",
    };

    let last = literals.len().saturating_sub(1);
    let resource: String = literals
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && single {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{prefix}{resource}")
}

/// Remove `{?...}` and `{&...}` expressions from a URI template.
fn strip_query_expressions(href: &str) -> String {
    let mut out = String::with_capacity(href.len());
    let mut rest = href;
    let next = |s: &str| match (s.find("{?"), s.find("{&")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    while let Some(start) = next(rest) {
        out.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strip a plural suffix from the last path segment (`coupons` → `coupon`).
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        return format!("{stem}y");
    }
    for suffix in ["ses", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{stem}{}", &suffix[..1]);
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Join the alphanumeric runs of `name` with underscores. A leading digit is
/// prefixed with `_`; a name with no alphanumerics becomes `unnamed`.
fn sanitize_identifier(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return "unnamed".to_string();
    }
    let joined = words.join("_");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_spaces() {
        let n = normalize_name("Retrieve a Coupon");
        assert_eq!(n.pascal_case, "RetrieveACoupon");
        assert_eq!(n.camel_case, "retrieveACoupon");
        assert_eq!(n.snake_case, "retrieve_a_coupon");
        assert_eq!(n.screaming_snake, "RETRIEVE_A_COUPON");
    }

    #[test]
    fn test_data_structure_id() {
        let n = normalize_name("Coupon Base");
        assert_eq!(n.pascal_case, "CouponBase");
        assert_eq!(n.original, "Coupon Base");
    }

    #[test]
    fn test_response_variant() {
        let n = normalize_name(&response_variant_name(200, Some("application/json")));
        assert_eq!(n.original, "http200_application_json");
        assert_eq!(n.pascal_case, "Http200ApplicationJson");
        assert_eq!(response_variant_name(204, None), "http204");
    }

    #[test]
    fn test_special_chars() {
        let n = normalize_name("spoiler_text");
        assert_eq!(n.pascal_case, "SpoilerText");
        assert_eq!(normalize_name("!!").snake_case, "unnamed");
    }

    #[test]
    fn test_route_to_name_list() {
        assert_eq!(route_to_name("GET", "/coupons"), "listCoupons");
        assert_eq!(route_to_name("POST", "/coupons"), "createCoupons");
    }

    #[test]
    fn test_route_to_name_single() {
        assert_eq!(route_to_name("GET", "/coupons/{id}"), "getCoupon");
        assert_eq!(route_to_name("DELETE", "/notes/{id}"), "deleteNote");
        assert_eq!(route_to_name("PATCH", "/notes/{id}"), "patchNote");
    }

    #[test]
    fn test_route_to_name_query_expressions() {
        assert_eq!(route_to_name("GET", "/coupons{?limit}"), "listCoupons");
        assert_eq!(
            route_to_name("GET", "/questions/{question_id}/choices{?page}{&per_page}"),
            "listQuestionsChoices"
        );
        assert_eq!(route_to_name("GET", "/messages/{id}{?full}"), "getMessage");
    }

    #[test]
    fn test_route_to_name_root() {
        assert_eq!(route_to_name("GET", "/"), "list");
        assert_eq!(route_to_name("GET", "/message"), "listMessage");
    }
}
