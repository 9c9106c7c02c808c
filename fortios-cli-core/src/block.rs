use serde::Serialize;

use crate::lexer::Token;

/// Verb that starts an attribute line inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    /// `set <attr> <values>` replaces the attribute.
    Set,
    /// `append <attr> <values>` extends a list attribute.
    Append,
    /// `unset <attr>` clears the attribute.
    Unset,
}

impl Directive {
    /// Map a line's first word to a directive.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "set" => Some(Self::Set),
            "append" => Some(Self::Append),
            "unset" => Some(Self::Unset),
            _ => None,
        }
    }
}

/// One attribute line of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetLine {
    pub directive: Directive,
    /// Attribute name, for example `srcaddr`.
    pub attr: String,
    /// Value tokens in source order.
    pub values: Vec<Token>,
    /// Absolute byte offset of the directive word.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
}

/// A parsed `edit … next` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditBlock {
    /// Tokens following `edit` on the begin line.
    pub key: Vec<Token>,
    /// Absolute byte offset of the `edit` keyword.
    pub offset: usize,
    /// 1-based line number of the `edit` line.
    pub line: usize,
    /// Top-level attribute lines in source order.
    pub settings: Vec<SetLine>,
}

/// The effective value of one attribute after applying every directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub values: Vec<&'a Token>,
    /// Line of the directive that last set the attribute.
    pub line: usize,
    pub offset: usize,
}

impl EditBlock {
    /// First key token, usually the numeric object ID.
    pub fn key_token(&self) -> Option<&Token> {
        self.key.first()
    }

    /// Resolve the effective value of `attr`.
    ///
    /// Later `set` lines replace earlier ones, `append` extends, and
    /// `unset` clears. Returns `None` if the attribute ends up unset.
    pub fn get(&self, attr: &str) -> Option<Attribute<'_>> {
        let mut current: Option<Attribute<'_>> = None;
        for setting in self.settings.iter().filter(|s| s.attr == attr) {
            match setting.directive {
                Directive::Set => {
                    current = Some(Attribute {
                        name: &setting.attr,
                        values: setting.values.iter().collect(),
                        line: setting.line,
                        offset: setting.offset,
                    });
                }
                Directive::Append => {
                    let entry = current.get_or_insert_with(|| Attribute {
                        name: &setting.attr,
                        values: Vec::new(),
                        line: setting.line,
                        offset: setting.offset,
                    });
                    entry.values.extend(setting.values.iter());
                    entry.line = setting.line;
                    entry.offset = setting.offset;
                }
                Directive::Unset => current = None,
            }
        }
        current
    }

    /// Whether any directive mentions `attr`.
    pub fn mentions(&self, attr: &str) -> bool {
        self.settings.iter().any(|s| s.attr == attr)
    }
}

#[cfg(test)]
mod tests {
    use super::{Directive, EditBlock, SetLine};
    use crate::lexer::Token;

    fn line(directive: Directive, attr: &str, values: &[&str], line: usize) -> SetLine {
        SetLine {
            directive,
            attr: attr.to_string(),
            values: values.iter().map(|v| Token::quoted(v)).collect(),
            offset: line * 10,
            line,
        }
    }

    fn block(settings: Vec<SetLine>) -> EditBlock {
        EditBlock {
            key: vec![Token::quoted("1")],
            offset: 0,
            line: 1,
            settings,
        }
    }

    fn values(block: &EditBlock, attr: &str) -> Option<Vec<String>> {
        block
            .get(attr)
            .map(|a| a.values.iter().map(|t| t.value.clone()).collect())
    }

    #[test]
    fn later_set_replaces_earlier() {
        let b = block(vec![
            line(Directive::Set, "srcaddr", &["a"], 2),
            line(Directive::Set, "srcaddr", &["b", "c"], 3),
        ]);
        assert_eq!(values(&b, "srcaddr"), Some(vec!["b".into(), "c".into()]));
        assert_eq!(b.get("srcaddr").expect("attr").line, 3);
    }

    #[test]
    fn append_extends_and_unset_clears() {
        let b = block(vec![
            line(Directive::Set, "service", &["HTTP"], 2),
            line(Directive::Append, "service", &["HTTPS"], 3),
        ]);
        assert_eq!(
            values(&b, "service"),
            Some(vec!["HTTP".into(), "HTTPS".into()])
        );

        let cleared = block(vec![
            line(Directive::Set, "service", &["HTTP"], 2),
            line(Directive::Unset, "service", &[], 3),
        ]);
        assert_eq!(values(&cleared, "service"), None);
        assert!(cleared.mentions("service"));
    }

    #[test]
    fn missing_attribute_is_none() {
        let b = block(vec![line(Directive::Set, "name", &["x"], 2)]);
        assert!(b.get("dstaddr").is_none());
        assert!(!b.mentions("dstaddr"));
    }
}
