//! Canonicalization shared by the V1 and V4 signers.
//!
//! Everything in here is a pure function over the request parts. Every
//! collection is sorted before it is serialized, the signatures depend on it.

use crate::constants::{
    CONTENT_MD5, OSS_HEADER_PREFIX, OSS_QUERY_ENCODE_SET, OSS_URI_ENCODE_SET,
};
use crate::SignatureVersion;
use http::header::{CONTENT_TYPE, DATE};
use http::request::Parts;
use http::uri::PathAndQuery;
use http::{HeaderMap, Uri};
use once_cell::sync::Lazy;
use ossign_core::Result;
use percent_encoding::utf8_percent_encode;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Percent-escape a resource path, keeping `/` separators.
pub fn escape_path(path: &str) -> String {
    utf8_percent_encode(path, &OSS_URI_ENCODE_SET).to_string()
}

/// Build the canonical query string from a raw (still encoded) query.
///
/// Keys and values are never decoded. A literal `+` is rewritten as `%20`,
/// pairs are sorted by key and empty values drop the `=`.
pub fn canonical_query(raw: &str) -> String {
    let raw = raw.replace('+', "%20");

    let mut params: Vec<(&str, &str)> = raw
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    // Stable sort keeps repeated keys in request order.
    params.sort_by(|a, b| a.0.cmp(b.0));

    join_pairs(params.into_iter(), "&")
}

/// Check whether a lower-cased header name is signed by default.
///
/// This is the only place deciding it: both the header block and the
/// reported signed header list go through here.
pub fn is_default_signed_header(name: &str, version: SignatureVersion) -> bool {
    if name.starts_with(OSS_HEADER_PREFIX) || name == CONTENT_TYPE.as_str() || name == CONTENT_MD5
    {
        return true;
    }

    match version {
        SignatureVersion::V1 => name == DATE.as_str(),
        SignatureVersion::V4 => false,
    }
}

/// Build a canonical header block from every header matching `select`.
///
/// Returns the block (`name:v1,v2\n` per header, names sorted) and the
/// sorted names that made it in.
pub fn canonical_headers(
    headers: &HeaderMap,
    select: impl Fn(&str) -> bool,
) -> (String, Vec<String>) {
    let mut names: Vec<&str> = headers
        .keys()
        .map(|k| k.as_str())
        .filter(|k| select(k))
        .collect();
    names.sort_unstable();

    let mut block = String::with_capacity(names.len() * 32);
    for name in &names {
        let values: Vec<String> = headers
            .get_all(*name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
            .collect();

        block.push_str(name);
        block.push(':');
        block.push_str(&values.join(","));
        block.push('\n');
    }

    (block, names.into_iter().map(String::from).collect())
}

/// Resolve the caller requested additional headers for V4.
///
/// Names are lower-cased, default signed headers and headers absent from the
/// request are dropped, the rest is sorted and de-duplicated.
pub fn additional_headers(headers: &HeaderMap, requested: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = requested
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !is_default_signed_header(k, SignatureVersion::V4))
        .filter(|k| headers.contains_key(k.as_str()))
        .collect();
    keys.sort();
    keys.dedup();

    keys
}

/// Read the first value of a header, empty if absent.
pub fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// Check whether a query parameter takes part in the V1 canonicalized resource.
pub fn is_v1_signed_parameter(key: &str, sub_resource: &[String]) -> bool {
    SUB_RESOURCES.contains(key)
        || key.starts_with(OSS_HEADER_PREFIX)
        || sub_resource.iter().any(|v| v == key)
}

/// Build the `?`-less sub-resource part of the V1 canonicalized resource.
///
/// Parameters are decoded, the first value of a repeated name wins.
pub fn canonical_sub_resource(raw: Option<&str>, sub_resource: &[String]) -> String {
    let mut params = BTreeMap::new();
    for (k, v) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        if is_v1_signed_parameter(&k, sub_resource) {
            params.entry(k.into_owned()).or_insert_with(|| v.into_owned());
        }
    }

    join_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())), "&")
}

/// Parse a raw query into decoded pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Encode decoded pairs back into a query string.
///
/// Pairs are sorted by key (stable for repeated keys) and every key and
/// value is escaped, so a space always comes out as `%20`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = pairs.iter().collect();
    // Sort on the decoded keys, not the escaped ones.
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let encoded: Vec<(String, String)> = sorted
        .into_iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &OSS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &OSS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();

    join_pairs(encoded.iter().map(|(k, v)| (k.as_str(), v.as_str())), "&")
}

/// Replace the query of the request uri, keeping scheme, authority and path.
pub fn set_query(parts: &mut Parts, query: &str) -> Result<()> {
    let mut uri_parts = std::mem::take(&mut parts.uri).into_parts();
    let path = uri_parts
        .path_and_query
        .as_ref()
        .map(|paq| paq.path().to_string())
        .unwrap_or_else(|| "/".to_string());

    let paq = if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    };
    uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
    parts.uri = Uri::from_parts(uri_parts)?;

    Ok(())
}

fn join_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>, join: &str) -> String {
    let mut s = String::with_capacity(16);

    for (idx, (k, v)) in pairs.enumerate() {
        if idx != 0 {
            s.push_str(join);
        }

        s.push_str(k);
        if !v.is_empty() {
            s.push('=');
            s.push_str(v);
        }
    }

    s
}

/// Query parameters that take part in the V1 canonicalized resource.
///
/// Besides the well known sub-resources this lists the vector bucket operations.
static SUB_RESOURCES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "acl",
        "bucketInfo",
        "location",
        "stat",
        "delete",
        "append",
        "tagging",
        "objectMeta",
        "uploads",
        "uploadId",
        "partNumber",
        "security-token",
        "position",
        "response-content-type",
        "response-content-language",
        "response-expires",
        "response-cache-control",
        "response-content-disposition",
        "response-content-encoding",
        "restore",
        "callback",
        "callback-var",
        "versions",
        "versioning",
        "versionId",
        "sequential",
        "continuation-token",
        "regionList",
        "cloudboxes",
        "symlink",
        "resourceGroup",
        "cors",
        "logging",
        "website",
        "referer",
        "lifecycle",
        "policy",
        "policyStatus",
        "encryption",
        "qos",
        "qosInfo",
        "requestPayment",
        "inventory",
        "inventoryId",
        "asyncFetch",
        "worm",
        "wormId",
        "wormExtend",
        "replication",
        "replicationProgress",
        "replicationLocation",
        "cname",
        "comp",
        "live",
        "status",
        "vod",
        "startTime",
        "endTime",
        "img",
        "style",
        "styleName",
        "udf",
        "udfName",
        "udfImage",
        "udfId",
        "udfImageDesc",
        "udfApplication",
        "udfApplicationLog",
        "transferAcceleration",
        "metaQuery",
        "accessPoint",
        "accessPointPolicy",
        "httpsConfig",
        "publicAccessBlock",
        "redundancyTransition",
        "responseHeader",
        "userDefinedLogFieldsConfig",
        "withHashContext",
        // Vector bucket operations.
        "putVectorIndex",
        "getVectorIndex",
        "listVectorIndexes",
        "deleteVectorIndex",
        "putVectors",
        "getVectors",
        "listVectors",
        "deleteVectors",
        "queryVectors",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("", ""; "empty")]
    #[test_case("b=2&a=1", "a=1&b=2"; "sorted")]
    #[test_case("a=&b", "a&b"; "empty values")]
    #[test_case("a=x+y", "a=x%20y"; "plus")]
    #[test_case("a=2&a=1", "a=2&a=1"; "repeated keys keep order")]
    #[test_case("%7Cp=1&p=2&%2Bp=3", "%2Bp=3&%7Cp=1&p=2"; "sorted on raw keys")]
    fn test_canonical_query(raw: &str, expected: &str) {
        assert_eq!(canonical_query(raw), expected);
    }

    #[test_case("x-oss-meta-a", SignatureVersion::V4, true)]
    #[test_case("content-md5", SignatureVersion::V4, true)]
    #[test_case("content-type", SignatureVersion::V1, true)]
    #[test_case("date", SignatureVersion::V1, true)]
    #[test_case("date", SignatureVersion::V4, false)]
    #[test_case("host", SignatureVersion::V4, false)]
    fn test_default_signed_header(name: &str, version: SignatureVersion, expected: bool) {
        assert_eq!(is_default_signed_header(name, version), expected);
    }

    #[test]
    fn test_canonical_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-oss-b", HeaderValue::from_static(" 2 "));
        headers.append("x-oss-a", HeaderValue::from_static("1"));
        headers.append("x-oss-a", HeaderValue::from_static("3"));
        headers.insert("host", HeaderValue::from_static("example.com"));

        let (block, names) = canonical_headers(&headers, |k| k.starts_with(OSS_HEADER_PREFIX));

        assert_eq!(block, "x-oss-a:1,3\nx-oss-b:2\n");
        assert_eq!(names, vec!["x-oss-a", "x-oss-b"]);
    }

    #[test]
    fn test_additional_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("abc", HeaderValue::from_static("1"));
        headers.insert("zabc", HeaderValue::from_static("1"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let requested: Vec<String> = ["ZAbc", "abc", "ABC", "Content-Type", "absent"]
            .iter()
            .map(|v| v.to_string())
            .collect();

        assert_eq!(additional_headers(&headers, &requested), vec!["abc", "zabc"]);
    }

    #[test]
    fn test_canonical_sub_resource() {
        let raw = "prefix=a&uploadId=2&acl&uploadId=1&x-oss-process=a%2Fb&custom=1";

        assert_eq!(
            canonical_sub_resource(Some(raw), &[]),
            "acl&uploadId=2&x-oss-process=a/b"
        );
        assert_eq!(
            canonical_sub_resource(Some(raw), &["custom".to_string()]),
            "acl&custom=1&uploadId=2&x-oss-process=a/b"
        );
        assert_eq!(canonical_sub_resource(None, &[]), "");
    }

    #[test]
    fn test_encode_query() {
        let pairs = vec![
            ("b".to_string(), "x y".to_string()),
            ("a".to_string(), "".to_string()),
            ("+c".to_string(), "1/2".to_string()),
        ];

        assert_eq!(encode_query(&pairs), "%2Bc=1%2F2&a&b=x%20y");
    }

    #[test]
    fn test_set_query() -> Result<()> {
        let (mut parts, _) = http::Request::get("https://bucket.oss-cn-hangzhou.aliyuncs.com/a%20b?x=1")
            .body(())
            .expect("request must be valid")
            .into_parts();

        set_query(&mut parts, "y=2")?;
        assert_eq!(
            parts.uri.to_string(),
            "https://bucket.oss-cn-hangzhou.aliyuncs.com/a%20b?y=2"
        );

        set_query(&mut parts, "")?;
        assert_eq!(parts.uri.query(), None);
        Ok(())
    }
}
