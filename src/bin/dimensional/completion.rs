use dimensional::resolver::UnitResolver;
use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper, Result,
};

/// Completes unit names and aliases.
pub struct UnitCompleter {
    /// `(name, description)` pairs, sorted by name
    entries: Vec<(String, String)>,
}

impl UnitCompleter {
    pub fn new(resolver: &UnitResolver) -> Self {
        let mut entries: Vec<(String, String)> = resolver
            .tokens()
            .filter_map(|name| {
                let def = resolver.definition(name)?;
                let description = if def.name().as_str() == name {
                    format!("{} ({})", name, def.family())
                } else {
                    format!("{} (alias of {})", name, def.name())
                };
                Some((name.to_owned(), description))
            })
            .collect();
        entries.sort_unstable();
        Self { entries }
    }
}

impl Completer for UnitCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>)> {
        if let Some(c) = line[pos..].chars().next() {
            if !c.is_whitespace() {
                // Don't return suggestions if cursor is in the middle of a word
                return Ok((0, Vec::new()));
            }
        }

        let word_start = find_word_start(line, pos);
        let part = &line[word_start..pos];
        let matches = self
            .entries
            .iter()
            .filter(|(name, _)| name.starts_with(part))
            .map(|(name, description)| Pair {
                display: description.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((word_start, matches))
    }
}

impl Highlighter for UnitCompleter {}
impl Hinter for UnitCompleter {
    type Hint = String;
}
impl Validator for UnitCompleter {}
impl Helper for UnitCompleter {}

#[inline]
fn is_unit_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '°' | '²' | '³' | '%')
}

fn find_word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .rfind(|c| !is_unit_char(c))
        .map(|start| start + line[start..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    #[test]
    fn find_word_start() {
        let cases = [
            ("abc", 0),
            ("123 abc", 4),
            ("2kg", 1),
            ("5 kg*m", 5),
            ("3 m·s", 5),
            ("1 °C", 2),
        ];

        for (line, expected_result) in cases {
            let start = super::find_word_start(line, line.len());
            assert_eq!(
                expected_result, start,
                "Finding start of word for '{}'. Expected {}, got {}.",
                line, expected_result, start
            );
        }
    }
}
