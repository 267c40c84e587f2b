//! Composable source fragments
//!
//! A [`Fragment`] is an immutable sequence of syntactic tokens. Composition
//! never mutates its inputs: every call returns a new fragment, so a
//! fragment held by several call sites always keeps its content.
//!
//! Fragments print with gofmt-style spacing through [`fmt::Display`].
//! Qualified names stay structured ([`Token::Qualified`]) so the emitter can
//! collect imports from them.

use std::fmt;
use std::sync::Arc;

/// Punctuation tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    /// `*`
    Star,
    /// `[]`
    Brackets,
    /// `...`
    Ellipsis,
    /// `<-` before `chan`
    RecvArrow,
    /// `<-` after `chan`
    SendArrow,
    /// `~`
    Tilde,
    /// `,`
    Comma,
    /// `=`
    Assign,
}

impl Punct {
    /// Source text of the token
    pub fn as_str(self) -> &'static str {
        match self {
            Punct::Star => "*",
            Punct::Brackets => "[]",
            Punct::Ellipsis => "...",
            Punct::RecvArrow | Punct::SendArrow => "<-",
            Punct::Tilde => "~",
            Punct::Comma => ",",
            Punct::Assign => "=",
        }
    }

    fn is_binary(self) -> bool {
        matches!(self, Punct::Assign)
    }
}

/// Delimiters of a [`Token::Group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    /// `(a, b)`
    Paren,
    /// `[a, b]`, type-parameter and type-argument lists
    Bracket,
    /// `[k]` glued to what follows: map keys and array lengths
    Index,
    /// `{ a; b }`
    Brace,
    /// `a | b`, union term lists
    Pipe,
}

impl Delim {
    fn open(self) -> &'static str {
        match self {
            Delim::Paren => "(",
            Delim::Bracket | Delim::Index => "[",
            Delim::Brace => "{",
            Delim::Pipe => "",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Delim::Paren => ")",
            Delim::Bracket | Delim::Index => "]",
            Delim::Brace => "}",
            Delim::Pipe => "",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Delim::Paren | Delim::Bracket | Delim::Index => ", ",
            Delim::Brace => "; ",
            Delim::Pipe => " | ",
        }
    }
}

/// A syntactic token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Identifier
    Ident(String),
    /// Keyword (`chan`, `func`, `map`, ...)
    Keyword(&'static str),
    /// Identifier declared in another package
    Qualified { import_path: String, name: String },
    /// Punctuation
    Punct(Punct),
    /// Delimited list of fragments
    Group { delim: Delim, items: Vec<Fragment> },
    /// Line comment
    Comment(String),
}

impl Token {
    fn is_word(&self) -> bool {
        matches!(
            self,
            Token::Ident(_) | Token::Keyword(_) | Token::Qualified { .. }
        )
    }
}

/// Whether a space separates two adjacent tokens
fn needs_space(prev: &Token, next: &Token) -> bool {
    match (prev, next) {
        (Token::Comment(_), _) => false,
        (Token::Keyword("chan"), Token::Punct(Punct::SendArrow)) => false,
        (Token::Keyword("chan"), Token::Group { delim: Delim::Paren, .. }) => true,
        (Token::Punct(Punct::SendArrow), _) => true,
        (Token::Punct(Punct::Comma), _) => true,
        (Token::Punct(punct), _) => punct.is_binary(),
        (Token::Group { delim: Delim::Index, .. }, _) => false,
        (_, Token::Punct(Punct::Comma)) => false,
        (_, Token::Punct(_)) => true,
        (Token::Group { .. }, _) => true,
        (
            Token::Ident(_) | Token::Qualified { .. } | Token::Keyword("chan"),
            Token::Group { delim: Delim::Index, .. },
        ) => true,
        (_, Token::Group { delim, .. }) => *delim == Delim::Pipe,
        (_, Token::Comment(_)) => true,
        (prev, next) => prev.is_word() && next.is_word(),
    }
}

/// Guess the package name an import path is referred to by
///
/// Uses the last path element, skipping a trailing major-version element
/// (`example.com/lib/v2` is package `lib`) and a gopkg.in style `.vN`
/// suffix (`gopkg.in/yaml.v3` is package `yaml`). The result is lower-cased
/// and stripped of anything that cannot appear in an identifier, falling
/// back to `pkg` when nothing is left.
pub fn package_name(import_path: &str) -> String {
    let mut elements = import_path.rsplit('/');
    let mut last = elements.next().unwrap_or(import_path);

    if is_major_version(last) {
        if let Some(parent) = elements.next() {
            last = parent;
        }
    }
    if let Some((base, version)) = last.rsplit_once('.') {
        if is_major_version(version) {
            last = base;
        }
    }

    let name: String = last
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .skip_while(char::is_ascii_digit)
        .collect();

    if name.is_empty() {
        "pkg".to_string()
    } else {
        name
    }
}

/// `v2`, `v10`
fn is_major_version(element: &str) -> bool {
    element.len() > 1
        && element.starts_with('v')
        && element[1..].chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(name),
            Token::Keyword(keyword) => f.write_str(keyword),
            Token::Qualified { import_path, name } => {
                write!(f, "{}.{}", package_name(import_path), name)
            }
            Token::Punct(punct) => f.write_str(punct.as_str()),
            Token::Group { delim, items } => {
                f.write_str(delim.open())?;
                if *delim == Delim::Brace && !items.is_empty() {
                    f.write_str(" ")?;
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(delim.separator())?;
                    }
                    write!(f, "{}", item)?;
                }
                if *delim == Delim::Brace && !items.is_empty() {
                    f.write_str(" ")?;
                }
                f.write_str(delim.close())
            }
            Token::Comment(text) if text.is_empty() => f.write_str("//\n"),
            Token::Comment(text) => writeln!(f, "// {}", text),
        }
    }
}

/// An immutable, composable unit of rendered source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    tokens: Arc<[Token]>,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::empty()
    }
}

impl Fragment {
    /// Create a fragment from tokens
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    /// The empty fragment; composing with it is a no-op
    pub fn empty() -> Self {
        Self::from_tokens(Vec::new())
    }

    /// Identifier fragment
    pub fn ident(name: impl Into<String>) -> Self {
        Self::from_tokens(vec![Token::Ident(name.into())])
    }

    /// Keyword fragment
    pub fn keyword(keyword: &'static str) -> Self {
        Self::from_tokens(vec![Token::Keyword(keyword)])
    }

    /// Package-qualified identifier fragment
    pub fn qualified(import_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from_tokens(vec![Token::Qualified {
            import_path: import_path.into(),
            name: name.into(),
        }])
    }

    /// Punctuation fragment
    pub fn punct(punct: Punct) -> Self {
        Self::from_tokens(vec![Token::Punct(punct)])
    }

    /// Delimited group fragment
    pub fn group(delim: Delim, items: impl IntoIterator<Item = Fragment>) -> Self {
        Self::from_tokens(vec![Token::Group {
            delim,
            items: items.into_iter().collect(),
        }])
    }

    /// Single line comment fragment
    pub fn comment(text: impl Into<String>) -> Self {
        Self::from_tokens(vec![Token::Comment(text.into())])
    }

    /// Tokens of this fragment
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of top-level tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the fragment has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append fragments, returning a new fragment
    pub fn then(&self, tail: impl IntoIterator<Item = Fragment>) -> Fragment {
        compose(self, tail)
    }

    /// Import paths of every qualified name, in order of appearance
    pub fn import_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_import_paths(&mut paths);
        paths
    }

    fn collect_import_paths<'a>(&'a self, paths: &mut Vec<&'a str>) {
        for token in self.tokens.iter() {
            match token {
                Token::Qualified { import_path, .. } => {
                    if !paths.contains(&import_path.as_str()) {
                        paths.push(import_path);
                    }
                }
                Token::Group { items, .. } => {
                    for item in items {
                        item.collect_import_paths(paths);
                    }
                }
                _ => {}
            }
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<&Token> = None;
        for token in self.tokens.iter() {
            if let Some(prev) = prev {
                if needs_space(prev, token) {
                    f.write_str(" ")?;
                }
            }
            write!(f, "{}", token)?;
            prev = Some(token);
        }
        Ok(())
    }
}

/// Append `tail` to `head`, returning a new fragment
pub fn compose(head: &Fragment, tail: impl IntoIterator<Item = Fragment>) -> Fragment {
    let mut tokens = head.tokens.to_vec();
    for fragment in tail {
        tokens.extend(fragment.tokens.iter().cloned());
    }
    Fragment::from_tokens(tokens)
}

/// Prefix `code` with one line comment per line of `text`
///
/// Empty text leaves the code unchanged.
pub fn with_comment(code: &Fragment, text: &str) -> Fragment {
    if text.is_empty() {
        return code.clone();
    }

    let comment: Vec<Token> = text
        .lines()
        .map(|line| Token::Comment(line.trim_end().to_string()))
        .collect();
    compose(&Fragment::from_tokens(comment), [code.clone()])
}

/// `x = append(x, value)`
pub fn self_append(slice_ref: &Fragment, value: Fragment) -> Fragment {
    compose(
        slice_ref,
        [
            Fragment::punct(Punct::Assign),
            Fragment::ident("append"),
            Fragment::group(Delim::Paren, [slice_ref.clone(), value]),
        ],
    )
}
