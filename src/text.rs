//! Small text helpers shared by the name, email and domain builders.

/// Replaces accented Latin characters with their ASCII base letter. Covers
/// the alphabets of the bundled locales, including the Polish stroked l that
/// plain Unicode decomposition misses.
pub fn strip_accents(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' => 'a',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ą' => 'A',
            'ç' | 'ć' | 'č' => 'c',
            'Ç' | 'Ć' | 'Č' => 'C',
            'é' | 'è' | 'ê' | 'ë' | 'ę' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' | 'Ę' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ł' => 'l',
            'Ł' => 'L',
            'ñ' | 'ń' => 'n',
            'Ñ' | 'Ń' => 'N',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => 'O',
            'ś' | 'š' => 's',
            'Ś' | 'Š' => 'S',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ý' | 'ÿ' => 'y',
            'Ý' => 'Y',
            'ź' | 'ż' | 'ž' => 'z',
            'Ź' | 'Ż' | 'Ž' => 'Z',
            other => other,
        })
        .collect()
}

/// Expands the German sharp s so email local parts stay ASCII.
pub fn strip_sharp_s(input: &str) -> String {
    input.replace('ß', "ss")
}

/// Escapes any remaining non-ASCII character as its four hex code-unit
/// digits, keeping host names built from non-Latin company names ASCII.
/// ASCII input passes through unchanged.
pub fn escape_non_ascii(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut buf = [0u16; 2];
            for unit in ch.encode_utf16(&mut buf) {
                out.push_str(&format!("{unit:04x}"));
            }
        }
    }
    out
}

/// Renders `number` in the base-26 alphabet `A..Z` (so 0 is "A", 25 is "Z",
/// 26 is "BA"). Used for letter prefixes of identity documents.
pub fn to_alpha_base26(number: u32) -> String {
    if number == 0 {
        return "A".to_string();
    }
    let mut digits = Vec::new();
    let mut n = number;
    while n > 0 {
        digits.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    digits.iter().rev().collect()
}

/// Left-pads `value` with `fill` up to `width` characters.
pub fn left_pad(value: &str, width: usize, fill: char) -> String {
    if value.len() >= width {
        return value.to_string();
    }
    let mut out = String::with_capacity(width);
    for _ in 0..(width - value.len()) {
        out.push(fill);
    }
    out.push_str(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_polish_and_western_accents() {
        assert_eq!(strip_accents("Łódź"), "Lodz");
        assert_eq!(strip_accents("Müller"), "Muller");
        assert_eq!(strip_accents("García"), "Garcia");
    }

    #[test]
    fn sharp_s_expands() {
        assert_eq!(strip_sharp_s("Straße"), "Strasse");
    }

    #[test]
    fn ascii_passes_escape_unchanged() {
        assert_eq!(escape_non_ascii("acme ltd"), "acme ltd");
    }

    #[test]
    fn non_ascii_becomes_hex_digits() {
        let escaped = escape_non_ascii("中");
        assert_eq!(escaped, "4e2d");
    }

    #[test]
    fn alpha_base26_matches_known_values() {
        assert_eq!(to_alpha_base26(0), "A");
        assert_eq!(to_alpha_base26(25), "Z");
        assert_eq!(to_alpha_base26(26), "BA");
    }

    #[test]
    fn left_pad_fills_to_width() {
        assert_eq!(left_pad("7", 3, '0'), "007");
        assert_eq!(left_pad("1234", 3, '0'), "1234");
    }
}
