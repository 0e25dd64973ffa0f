use crate::error::XreqError;

pub fn exit_code_for_error(err: &XreqError) -> i32 {
    match err {
        XreqError::InvalidUrl(_) => 3,
        XreqError::Config(_) | XreqError::InvalidHeader(_) => 2,
        XreqError::Proxy(_) => 5,
        XreqError::Auth(_) => 94,
        XreqError::Io(_) => 26,
        XreqError::Json(_) => 23,
        XreqError::Unsupported(_) => 4,
        XreqError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_builder() {
        return 3;
    }
    if err.is_request() {
        return 2;
    }
    43
}
