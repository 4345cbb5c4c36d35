// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in oss services.
pub const OSS_HEADER_PREFIX: &str = "x-oss-";
pub const X_OSS_DATE: &str = "x-oss-date";
pub const X_OSS_SECURITY_TOKEN: &str = "x-oss-security-token";
pub const X_OSS_CONTENT_SHA256: &str = "x-oss-content-sha256";
pub const CONTENT_MD5: &str = "content-md5";

// Query parameters used by V1 presigned urls.
pub const QUERY_V1_EXPIRES: &str = "Expires";
pub const QUERY_V1_ACCESS_KEY_ID: &str = "OSSAccessKeyId";
pub const QUERY_V1_SIGNATURE: &str = "Signature";
pub const QUERY_V1_SECURITY_TOKEN: &str = "security-token";

// Query parameters used by V4 presigned urls.
pub const QUERY_V4_SIGNATURE_VERSION: &str = "x-oss-signature-version";
pub const QUERY_V4_DATE: &str = "x-oss-date";
pub const QUERY_V4_EXPIRES: &str = "x-oss-expires";
pub const QUERY_V4_CREDENTIAL: &str = "x-oss-credential";
pub const QUERY_V4_ADDITIONAL_HEADERS: &str = "x-oss-additional-headers";
pub const QUERY_V4_SECURITY_TOKEN: &str = "x-oss-security-token";
pub const QUERY_V4_SIGNATURE: &str = "x-oss-signature";

/// Query parameters written by V1 query signing, replaced on every signing.
pub const QUERY_V1_PRESIGN_PARAMS: [&str; 4] = [
    QUERY_V1_EXPIRES,
    QUERY_V1_ACCESS_KEY_ID,
    QUERY_V1_SIGNATURE,
    QUERY_V1_SECURITY_TOKEN,
];
/// Query parameters written by V4 query signing, replaced on every signing.
pub const QUERY_V4_PRESIGN_PARAMS: [&str; 7] = [
    QUERY_V4_SIGNATURE_VERSION,
    QUERY_V4_DATE,
    QUERY_V4_EXPIRES,
    QUERY_V4_CREDENTIAL,
    QUERY_V4_ADDITIONAL_HEADERS,
    QUERY_V4_SECURITY_TOKEN,
    QUERY_V4_SIGNATURE,
];

// Signature schemes.
pub const SIGNING_ALGORITHM_V4: &str = "OSS4-HMAC-SHA256";
pub const V4_SECRET_PREFIX: &str = "aliyun_v4";
pub const V4_REQUEST_TYPE: &str = "aliyun_v4_request";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Expiry used by presigned urls when the caller does not set one.
pub const DEFAULT_EXPIRES_SECONDS: i64 = 15 * 60;

// Env values used in oss services.
pub const ALIBABA_CLOUD_OSS_REGION: &str = "ALIBABA_CLOUD_OSS_REGION";
pub const ALIBABA_CLOUD_OSS_SIGNATURE_VERSION: &str = "ALIBABA_CLOUD_OSS_SIGNATURE_VERSION";
pub const ALIBABA_CLOUD_OSS_ADDITIONAL_HEADERS: &str = "ALIBABA_CLOUD_OSS_ADDITIONAL_HEADERS";
pub const ALIBABA_CLOUD_ACCOUNT_ID: &str = "ALIBABA_CLOUD_ACCOUNT_ID";

/// AsciiSet for the canonical URI.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - The path separator '/' is kept.
pub static OSS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for query keys and values written back to presigned urls.
///
/// Same as [`OSS_URI_ENCODE_SET`] but '/' is encoded too.
pub static OSS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
