//! Project-wide class symbol table.
//!
//! Built in a first pass over every analyzed file so that sniffs can ask
//! inheritance questions ("does any ancestor of `App\Foo` declare
//! `getName`?") without loading the code. Names are stored fully qualified
//! without the leading `\` and compared case-insensitively, as PHP does.

use crate::stream::TokenStream;
use crate::token::TokenKind;
use std::collections::{HashMap, HashSet, VecDeque};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// `class`.
    Class,
    /// `interface`.
    Interface,
    /// `trait`.
    Trait,
}

/// A class, interface or trait declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSymbol {
    /// Fully qualified name.
    pub name: String,
    /// Declaration kind.
    pub kind: SymbolKind,
    /// Parent class (for interfaces, see `interfaces`).
    pub parents: Vec<String>,
    /// Implemented interfaces, or extended interfaces for an interface.
    pub interfaces: Vec<String>,
    /// Traits used in the body.
    pub traits: Vec<String>,
    /// Names of the methods declared in the body.
    pub methods: Vec<String>,
}

impl ClassSymbol {
    /// Returns true if this declaration itself declares `method`.
    #[must_use]
    pub fn declares(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Transitive ancestors of a class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    /// Parents and interfaces, nearest first.
    pub names: Vec<String>,
    /// False when at least one ancestor is not in the table.
    pub complete: bool,
}

impl Ancestry {
    /// Returns true if `name` is an ancestor.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim_start_matches('\\');
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Symbol table of all declared types.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    classes: HashMap<String, ClassSymbol>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a set of token streams.
    pub fn build<'a>(streams: impl IntoIterator<Item = &'a TokenStream>) -> Self {
        let mut table = Self::new();
        for stream in streams {
            table.add_file(stream);
        }
        table
    }

    /// Adds every declaration found in `stream`.
    pub fn add_file(&mut self, stream: &TokenStream) {
        let names = NameContext::scan(stream);
        for index in 0..stream.len() {
            if stream.is_type_declaration(index) {
                if let Some(symbol) = read_declaration(stream, index, &names) {
                    self.classes.insert(symbol.name.to_ascii_lowercase(), symbol);
                }
            }
        }
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up a declaration by fully qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassSymbol> {
        self.classes
            .get(&name.trim_start_matches('\\').to_ascii_lowercase())
    }

    /// Returns the innermost named type whose body contains `index`.
    #[must_use]
    pub fn class_at(&self, stream: &TokenStream, index: usize) -> Option<&ClassSymbol> {
        let declaration = (0..index)
            .rev()
            .filter(|&k| stream.is_type_declaration(k))
            .find(|&k| {
                stream
                    .scope_opener(k)
                    .zip(stream.scope_closer(k))
                    .is_some_and(|(open, close)| open < index && index < close)
            })?;
        let names = NameContext::scan(stream);
        let short = stream.declaration_name(declaration)?;
        self.get(&names.qualify(short, declaration))
    }

    /// Collects every parent and interface of `name`, transitively.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Ancestry {
        let mut ancestry = Ancestry {
            names: Vec::new(),
            complete: true,
        };
        let Some(start) = self.get(name) else {
            ancestry.complete = false;
            return ancestry;
        };

        let mut seen = HashSet::new();
        let mut queue: VecDeque<&String> = start.parents.iter().chain(&start.interfaces).collect();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.to_ascii_lowercase()) {
                continue;
            }
            ancestry.names.push(next.clone());
            match self.get(next) {
                Some(symbol) => queue.extend(symbol.parents.iter().chain(&symbol.interfaces)),
                None => ancestry.complete = false,
            }
        }
        ancestry
    }

    /// Decides whether an ancestor of `class` declares `method`.
    ///
    /// Returns `None` when `class` is unknown, or when no known ancestor
    /// declares the method but some ancestor is outside the table.
    #[must_use]
    pub fn inherits_method(&self, class: &str, method: &str) -> Option<bool> {
        self.get(class)?;
        let ancestry = self.ancestors(class);
        let mut complete = ancestry.complete;
        for name in &ancestry.names {
            match self.declares_method(name, method, 0) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => complete = false,
            }
        }
        complete.then_some(false)
    }

    /// Checks a declaration and the traits it uses.
    fn declares_method(&self, name: &str, method: &str, depth: usize) -> Option<bool> {
        // Trait cycles are a fatal error in PHP; stop rather than recurse forever.
        if depth > 16 {
            return None;
        }
        let symbol = self.get(name)?;
        if symbol.declares(method) {
            return Some(true);
        }
        let mut known = true;
        for used in &symbol.traits {
            match self.declares_method(used, method, depth + 1) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => known = false,
            }
        }
        known.then_some(false)
    }
}

/// Namespace and import statements of one file.
#[derive(Debug, Default)]
struct NameContext {
    /// `(token index, namespace)` for each `namespace` statement.
    namespaces: Vec<(usize, String)>,
    /// `(token index, alias, target)` for each imported class.
    imports: Vec<(usize, String, String)>,
}

impl NameContext {
    fn scan(stream: &TokenStream) -> Self {
        let mut context = Self::default();
        let bodies: Vec<(usize, usize)> = (0..stream.len())
            .filter(|&k| stream.is_type_declaration(k) || stream.is_anonymous_class(k))
            .filter_map(|k| stream.scope_opener(k).zip(stream.scope_closer(k)))
            .collect();

        for (index, token) in stream.iter().enumerate() {
            match token.kind {
                TokenKind::Namespace => {
                    let Some(start) = stream.next_significant(index) else {
                        continue;
                    };
                    // `namespace\foo()` is a relative name, not a declaration.
                    if stream[start].kind == TokenKind::NsSeparator {
                        continue;
                    }
                    let name = read_name(stream, start).map(|(n, _)| n).unwrap_or_default();
                    context.namespaces.push((index, name));
                }
                TokenKind::Use => {
                    let inside_type = bodies.iter().any(|&(o, c)| o < index && index < c);
                    let after_paren = stream
                        .previous_significant(index)
                        .is_some_and(|p| stream[p].kind == TokenKind::CloseParenthesis);
                    if !inside_type && !after_paren {
                        context.read_imports(stream, index);
                    }
                }
                _ => {}
            }
        }
        context
    }

    /// Reads `use A\B;`, `use A\B as C, D;` and `use A\{B, C as D};`.
    fn read_imports(&mut self, stream: &TokenStream, use_index: usize) {
        let Some(mut cursor) = stream.next_significant(use_index) else {
            return;
        };
        // Function and constant imports never name a class.
        if matches!(stream[cursor].content.to_ascii_lowercase().as_str(), "function" | "const") {
            return;
        }

        let mut prefix = String::new();
        loop {
            let Some((name, next)) = read_name(stream, cursor) else {
                return;
            };
            let mut after = next;

            if stream.get(after).map(|t| t.kind) == Some(TokenKind::OpenCurlyBracket) {
                prefix = name.trim_end_matches('\\').to_string();
                match stream.next_significant(after) {
                    Some(n) => cursor = n,
                    None => return,
                }
                continue;
            }

            let target = if prefix.is_empty() {
                name.trim_start_matches('\\').to_string()
            } else {
                format!("{prefix}\\{name}")
            };
            let mut alias = target.rsplit('\\').next().unwrap_or_default().to_string();

            if let Some(a) = stream.next_significant(after.saturating_sub(1)) {
                if stream[a].content.eq_ignore_ascii_case("as") {
                    if let Some(alias_index) = stream.next_significant(a) {
                        alias = stream[alias_index].content.clone();
                        after = alias_index + 1;
                    }
                }
            }
            self.imports.push((use_index, alias, target));

            let Some(separator) = stream.find_next_excluding(TokenKind::EMPTY, after) else {
                return;
            };
            match stream[separator].kind {
                TokenKind::Comma => match stream.next_significant(separator) {
                    Some(n) => cursor = n,
                    None => return,
                },
                TokenKind::CloseCurlyBracket => {
                    prefix.clear();
                    match stream.find_next_excluding(TokenKind::EMPTY, separator + 1) {
                        Some(n) if stream[n].kind == TokenKind::Comma => {
                            match stream.next_significant(n) {
                                Some(m) => cursor = m,
                                None => return,
                            }
                        }
                        _ => return,
                    }
                }
                _ => return,
            }
        }
    }

    fn namespace_at(&self, index: usize) -> Option<&(usize, String)> {
        self.namespaces.iter().rev().find(|(i, _)| *i < index)
    }

    /// Resolves a class reference written at `index` to a fully qualified name.
    fn qualify(&self, name: &str, index: usize) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }

        let (ns_index, namespace) = self
            .namespace_at(index)
            .map_or((0, ""), |(i, n)| (*i, n.as_str()));
        let next_ns = self
            .namespaces
            .iter()
            .map(|(i, _)| *i)
            .find(|&i| i > ns_index)
            .unwrap_or(usize::MAX);

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let imported = self
            .imports
            .iter()
            .filter(|(i, _, _)| *i >= ns_index && *i < next_ns)
            .find(|(_, alias, _)| alias.eq_ignore_ascii_case(first));
        if let Some((_, _, target)) = imported {
            return match rest {
                Some(rest) => format!("{target}\\{rest}"),
                None => target.clone(),
            };
        }

        if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{namespace}\\{name}")
        }
    }
}

/// Reads a possibly qualified name starting at `start`.
///
/// Returns the name and the index just past it.
fn read_name(stream: &TokenStream, start: usize) -> Option<(String, usize)> {
    let mut name = String::new();
    let mut index = start;
    while let Some(token) = stream.get(index) {
        match token.kind {
            TokenKind::NsSeparator => name.push('\\'),
            TokenKind::String => name.push_str(&token.content),
            // Keywords are valid namespace segments (`App\Array\Helper`).
            _ if !name.is_empty()
                && name.ends_with('\\')
                && token.content.chars().all(|c| c.is_alphanumeric() || c == '_') =>
            {
                name.push_str(&token.content);
            }
            _ => break,
        }
        index += 1;
    }
    (!name.is_empty()).then_some((name, index))
}

/// Reads a comma-separated list of names after `extends` or `implements`.
fn read_name_list(stream: &TokenStream, keyword: usize, names: &NameContext) -> Vec<String> {
    let mut list = Vec::new();
    let mut cursor = stream.next_significant(keyword);
    while let Some(start) = cursor {
        let Some((name, next)) = read_name(stream, start) else {
            break;
        };
        list.push(names.qualify(&name, keyword));
        cursor = match stream.find_next_excluding(TokenKind::EMPTY, next) {
            Some(sep) if stream[sep].kind == TokenKind::Comma => stream.next_significant(sep),
            _ => None,
        };
    }
    list
}

fn read_declaration(stream: &TokenStream, index: usize, names: &NameContext) -> Option<ClassSymbol> {
    let kind = match stream[index].kind {
        TokenKind::Class => SymbolKind::Class,
        TokenKind::Interface => SymbolKind::Interface,
        TokenKind::Trait => SymbolKind::Trait,
        _ => return None,
    };
    let short = stream.declaration_name(index)?;
    let opener = stream.scope_opener(index)?;
    let closer = stream.matching(opener)?;

    let mut symbol = ClassSymbol {
        name: names.qualify(short, index),
        kind,
        parents: Vec::new(),
        interfaces: Vec::new(),
        traits: Vec::new(),
        methods: Vec::new(),
    };

    for header in index..opener {
        match stream[header].kind {
            TokenKind::Extends if kind == SymbolKind::Interface => {
                symbol.interfaces = read_name_list(stream, header, names);
            }
            TokenKind::Extends => symbol.parents = read_name_list(stream, header, names),
            TokenKind::Implements => symbol.interfaces = read_name_list(stream, header, names),
            _ => {}
        }
    }

    let mut cursor = opener + 1;
    while cursor < closer {
        match stream[cursor].kind {
            TokenKind::Function if !stream.is_closure(cursor) => {
                if let Some(name) = stream.declaration_name(cursor) {
                    symbol.methods.push(name.to_string());
                }
                cursor = stream
                    .scope_closer(cursor)
                    .or_else(|| stream.find_next(&[TokenKind::Semicolon], cursor))
                    .unwrap_or(closer);
            }
            TokenKind::Use => {
                symbol.traits.extend(read_name_list(stream, cursor, names));
            }
            _ => {}
        }
        cursor += 1;
    }

    Some(symbol)
}
