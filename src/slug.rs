/// Column width of stored slugs.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Derive a URL-safe slug from a display name: non-ASCII letters are
/// transliterated (Cyrillic by a fixed table, everything else through
/// `deunicode`), runs of separators become one `-`, and the result is cut to
/// [`MAX_SLUG_LENGTH`] at a word boundary where possible.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let ascii = if c.is_ascii() {
            None
        } else {
            transliterate(c).or_else(|| deunicode::deunicode_char(c))
        };
        let mut buf = [0u8; 4];
        let piece: &str = match ascii {
            Some(p) => p,
            None if c.is_ascii() => &*c.encode_utf8(&mut buf),
            None => continue,
        };

        for a in piece.chars().map(|a| a.to_ascii_lowercase()) {
            if a.is_ascii_alphanumeric() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push(a);
            } else if a.is_whitespace() || a == '-' || a == '_' {
                pending_dash = true;
            }
        }
    }

    truncate_slug(out, MAX_SLUG_LENGTH)
}

/// Cut `slug` to at most `max` bytes, preferring to drop whole words.
fn truncate_slug(mut slug: String, max: usize) -> String {
    if slug.len() <= max {
        return slug;
    }
    // slugs are pure ASCII, so any byte index is a char boundary
    let cut = if slug.as_bytes()[max] == b'-' {
        max
    } else {
        match slug[..max].rfind('-') {
            Some(i) if i > 0 => i,
            _ => max,
        }
    };
    slug.truncate(cut);
    slug
}

fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "iu",
        'я' => "ia",
        _ => return None,
    };
    Some(s)
}
