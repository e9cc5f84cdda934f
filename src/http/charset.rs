use crate::logging::syslog::debug;

/// Decode body bytes with the given charset label. Without a label the bytes are
/// read as UTF-8 when valid and as ISO-8859-1 otherwise.
pub fn decode_text(bytes: &[u8], charset: Option<&str>) -> String {
    let Some(label) = charset else {
        return match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => decode_latin1(bytes),
        };
    };

    match label.trim().trim_matches('"').to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8_lossy(bytes).to_string(),
        // Strict ISO-8859-1: every byte is the code point of the same value
        "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => decode_latin1(bytes),
        "us-ascii" | "ascii" => bytes.iter().map(|b| if b.is_ascii() { *b as char } else { char::REPLACEMENT_CHARACTER }).collect(),
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(encoding) => {
                let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
                if had_errors {
                    debug(format!("Body is not valid {}, undecodable bytes were replaced", encoding.name()));
                }
                text.into_owned()
            }
            None => {
                debug(format!("Unsupported charset '{}', decoding body as UTF-8", other));
                String::from_utf8_lossy(bytes).to_string()
            }
        },
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Extract the `charset` parameter of a `Content-Type` value.
pub fn charset_of_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// The media type of a `Content-Type` value, lowercased and without parameters.
pub fn media_type_of_content_type(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}
