use crate::error::ResponseError;

/// Cut a raw response at its carriage-return terminator, discarding the
/// USB padding garbage that follows it up to the 64-byte boundary.
///
/// Fails with [`ResponseError::NoTerminator`] when no CR exists, which
/// signals a truncated or protocol-violating response; callers must not
/// treat that as an empty response.
pub fn trim_response(raw: &[u8]) -> Result<&[u8], ResponseError> {
    let end = raw
        .iter()
        .position(|&byte| byte == b'\r')
        .ok_or(ResponseError::NoTerminator)?;
    Ok(&raw[..end])
}

/// Split one of the LabPro's `{a,b,c}` list literals into its elements.
///
/// Elements are taken verbatim: no whitespace trimming and no escape
/// sequences, because the device defines none. The element before the
/// first `}` closes the list; anything after it is ignored.
pub fn parse_list(raw: &str) -> Result<Vec<String>, ResponseError> {
    let body = raw.strip_prefix('{').ok_or(ResponseError::BadList)?;
    let (body, _) = body.split_once('}').ok_or(ResponseError::BadList)?;
    Ok(body.split(',').map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_cuts_at_the_terminator() {
        let raw = b"DATA\r\0\0\0\0\0";
        assert_eq!(trim_response(raw).unwrap(), b"DATA");
    }

    #[test]
    fn trim_of_an_immediate_terminator_is_empty() {
        assert_eq!(trim_response(b"\r\0\0").unwrap(), b"");
    }

    #[test]
    fn trim_without_terminator_fails() {
        assert_eq!(trim_response(b"DATA"), Err(ResponseError::NoTerminator));
        assert_eq!(trim_response(b""), Err(ResponseError::NoTerminator));
    }

    #[test]
    fn parses_multi_element_lists() {
        assert_eq!(parse_list("{1,2,3}").unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn parses_single_element_lists() {
        assert_eq!(parse_list("{x}").unwrap(), vec!["x"]);
    }

    #[test]
    fn elements_are_verbatim() {
        assert_eq!(parse_list("{ 1 ,2}").unwrap(), vec![" 1 ", "2"]);
    }

    #[test]
    fn missing_brace_fails_without_partial_output() {
        assert_eq!(parse_list("1,2,3}"), Err(ResponseError::BadList));
        assert_eq!(parse_list("{1,2,3"), Err(ResponseError::BadList));
    }
}
