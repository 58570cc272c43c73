//! Finite Kripke models: worlds, accessibility relation, valuation.
//!
//! A model is built through the `add_*` methods (all idempotent, all
//! chainable) or loaded from the `.kripke` text format:
//!
//! ```text
//! # worlds, edges, and valuations, in any order
//! W = {w1, w2, w3};
//! R = {(w1, w2), (w2, w3), (w3, w3)};
//! V(p) = {w2, w3};
//! V(q) = {};
//! ```
//!
//! Worlds mentioned only in `R` or `V` are remembered but not part of the
//! model's world set: evaluation is defined over declared worlds only, so
//! such stray references never show up in a result set.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::bitset::WorldSet;
use crate::types::World;

/// A model description failed to load.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty model description")]
    Empty,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        line: usize,
        expected: &'static str,
        found: String,
    },
}

/// A finite Kripke model `(W, R, V)`.
#[derive(Debug, Default)]
pub struct Kripke {
    /// Every world name ever mentioned, in first-mention order.
    names: Vec<String>,
    ids: HashMap<String, World>,
    /// The declared world set `W`.
    worlds: WorldSet,
    /// Adjacency rows indexed by world, `R`.
    relation: Vec<WorldSet>,
    /// Valuation `V`: variable name to the worlds where it holds.
    valuation: BTreeMap<String, WorldSet>,
    /// Worlds of `W` without outgoing edges, computed on first use.
    blind: OnceCell<WorldSet>,
}

impl Kripke {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> World {
        if let Some(&world) = self.ids.get(name) {
            return world;
        }
        let world = World::new(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), world);
        self.relation.push(WorldSet::empty());
        world
    }

    /// Declare a world.
    pub fn add_world(&mut self, name: &str) -> &mut Self {
        let world = self.intern(name);
        self.worlds.insert(world);
        self.blind.take();
        self
    }

    /// Declare several worlds.
    pub fn add_worlds<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_world(name.as_ref());
        }
        self
    }

    /// Add an accessibility edge from `from` to `to`.
    pub fn add_trans(&mut self, from: &str, to: &str) -> &mut Self {
        let from = self.intern(from);
        let to = self.intern(to);
        self.relation[from.index()].insert(to);
        self.blind.take();
        self
    }

    /// Add several accessibility edges.
    pub fn add_transes<I, S>(&mut self, edges: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        for (from, to) in edges {
            self.add_trans(from.as_ref(), to.as_ref());
        }
        self
    }

    /// Record that variable `var` holds in world `world`.
    pub fn add_val(&mut self, var: &str, world: &str) -> &mut Self {
        let world = self.intern(world);
        self.valuation.entry(var.to_string()).or_default().insert(world);
        self
    }

    /// Record that variable `var` holds in each of the given worlds.
    pub fn add_vals<I, S>(&mut self, var: &str, worlds: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for world in worlds {
            self.add_val(var, world.as_ref());
        }
        self
    }

    /// The declared world set `W`.
    pub fn worlds(&self) -> &WorldSet {
        &self.worlds
    }

    /// Look up a world by name. Returns worlds mentioned anywhere, including
    /// ones that are not part of `W`.
    pub fn world(&self, name: &str) -> Option<World> {
        self.ids.get(name).copied()
    }

    /// Whether `name` is a declared world.
    pub fn contains(&self, name: &str) -> bool {
        self.world(name).is_some_and(|w| self.worlds.contains(w))
    }

    /// The name of a world of this model.
    pub fn world_name(&self, world: World) -> &str {
        &self.names[world.index()]
    }

    /// The worlds reachable from `world` in one step.
    pub fn successors(&self, world: World) -> &WorldSet {
        &self.relation[world.index()]
    }

    /// The worlds of `W` where `var` holds.
    ///
    /// Unknown variables hold nowhere. Valuation entries pointing at
    /// undeclared worlds are ignored.
    pub fn valuation(&self, var: &str) -> WorldSet {
        match self.valuation.get(var) {
            Some(set) => set.intersection(&self.worlds),
            None => WorldSet::empty(),
        }
    }

    /// The declared worlds with no outgoing edges.
    ///
    /// Computed on first use and cached; the cache is dropped whenever
    /// worlds or edges are added.
    pub fn blind_worlds(&self) -> &WorldSet {
        self.blind.get_or_init(|| {
            let blind: WorldSet = self
                .worlds
                .iter()
                .filter(|&w| self.relation[w.index()].is_empty())
                .collect();
            debug!("computed blind worlds: {}", self.format_worlds(&blind));
            blind
        })
    }

    /// The names of the given worlds, sorted alphabetically.
    pub fn world_names(&self, set: &WorldSet) -> Vec<&str> {
        let mut names: Vec<&str> = set.iter().map(|w| self.world_name(w)).collect();
        names.sort_unstable();
        names
    }

    /// Render a world set as `{a, b, c}` with names sorted alphabetically.
    pub fn format_worlds(&self, set: &WorldSet) -> String {
        format!("{{{}}}", self.world_names(set).join(", "))
    }
}

impl fmt::Display for Kripke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let worlds: Vec<&str> = self.worlds.iter().map(|w| self.world_name(w)).collect();
        let mut lines = vec![format!("W    = {{{}}}", worlds.join(", "))];

        let mut pairs = Vec::new();
        for (index, targets) in self.relation.iter().enumerate() {
            let from = World::new(index as u32);
            for to in targets {
                pairs.push(format!("({}, {})", self.world_name(from), self.world_name(to)));
            }
        }
        lines.push(format!("R    = {{{}}}", pairs.join(", ")));

        for (var, set) in &self.valuation {
            let worlds: Vec<&str> = set.iter().map(|w| self.world_name(w)).collect();
            lines.push(format!("V({}) = {{{}}}", var, worlds.join(", ")));
        }

        write!(f, "{}", lines.join("\n"))
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Character scanner over a comment-stripped model description.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_whitespace()) {
            self.bump();
        }
    }

    fn line(&self) -> usize {
        self.input[..self.pos].matches('\n').count() + 1
    }

    fn unexpected(&self, expected: &'static str, found: Option<char>) -> ModelError {
        ModelError::Unexpected {
            line: self.line(),
            expected,
            found: match found {
                Some(ch) => format!("{:?}", ch),
                None => "end of input".to_string(),
            },
        }
    }

    fn expect(&mut self, ch: char, expected: &'static str) -> Result<(), ModelError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == ch => {
                self.bump();
                Ok(())
            }
            other => Err(self.unexpected(expected, other)),
        }
    }

    fn ident(&mut self) -> Result<&'a str, ModelError> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            let found = self.peek();
            return Err(self.unexpected("an identifier", found));
        }
        Ok(&self.input[start..self.pos])
    }

    /// `{ a, b, c }` or `{}`.
    fn ident_set(&mut self) -> Result<Vec<&'a str>, ModelError> {
        self.expect('{', "'{'")?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(items);
        }
        loop {
            items.push(self.ident()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(items),
                other => return Err(self.unexpected("',' or '}'", other)),
            }
        }
    }

    /// `{ (a, b), (c, d) }` or `{}`.
    fn pair_set(&mut self) -> Result<Vec<(&'a str, &'a str)>, ModelError> {
        self.expect('{', "'{'")?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(items);
        }
        loop {
            self.expect('(', "'('")?;
            let from = self.ident()?;
            self.expect(',', "','")?;
            let to = self.ident()?;
            self.expect(')', "')'")?;
            items.push((from, to));
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(items),
                other => return Err(self.unexpected("',' or '}'", other)),
            }
        }
    }
}

impl Kripke {
    /// Parse a model from the `.kripke` text format.
    ///
    /// `#` starts a comment running to the end of the line. Statements end
    /// with `;` and may appear in any order, repeatedly; repeated statements
    /// accumulate.
    pub fn parse(text: &str) -> Result<Kripke, ModelError> {
        // Strip comments, keep line structure for error positions.
        let stripped: String = text
            .lines()
            .map(|line| match line.find('#') {
                Some(i) => &line[..i],
                None => line,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if stripped.trim().is_empty() {
            return Err(ModelError::Empty);
        }

        let mut kripke = Kripke::new();
        let mut scanner = Scanner::new(&stripped);

        loop {
            scanner.skip_ws();
            let Some(keyword) = scanner.peek() else {
                break;
            };
            match keyword {
                'W' => {
                    scanner.bump();
                    scanner.expect('=', "'='")?;
                    let worlds = scanner.ident_set()?;
                    debug!("W statement: {:?}", worlds);
                    kripke.add_worlds(worlds);
                }
                'R' => {
                    scanner.bump();
                    scanner.expect('=', "'='")?;
                    let edges = scanner.pair_set()?;
                    debug!("R statement: {:?}", edges);
                    kripke.add_transes(edges);
                }
                'V' => {
                    scanner.bump();
                    scanner.expect('(', "'('")?;
                    let var = scanner.ident()?;
                    scanner.expect(')', "')'")?;
                    scanner.expect('=', "'='")?;
                    let worlds = scanner.ident_set()?;
                    debug!("V({}) statement: {:?}", var, worlds);
                    kripke.add_vals(var, worlds);
                }
                other => {
                    return Err(scanner.unexpected("a 'W', 'R', or 'V' statement", Some(other)));
                }
            }
            scanner.expect(';', "';'")?;
        }

        Ok(kripke)
    }

    /// Parse a model from any reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Kripke, ModelError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Load a model from a `.kripke` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Kripke, ModelError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("kripke") {
            warn!("model file {} does not have a .kripke extension", path.display());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_builder() {
        let mut k = Kripke::new();
        k.add_worlds(["w1", "w2"])
            .add_trans("w1", "w2")
            .add_val("p", "w2");

        assert_eq!(k.worlds().len(), 2);
        assert!(k.contains("w1"));
        assert!(k.contains("w2"));
        assert!(!k.contains("w3"));

        let w1 = k.world("w1").unwrap();
        let w2 = k.world("w2").unwrap();
        assert!(k.successors(w1).contains(w2));
        assert!(k.successors(w2).is_empty());

        assert!(k.valuation("p").contains(w2));
        assert!(k.valuation("q").is_empty());
    }

    #[test]
    fn test_builder_is_idempotent() {
        let mut k = Kripke::new();
        k.add_world("a").add_world("a").add_worlds(["a", "a"]);
        assert_eq!(k.worlds().len(), 1);

        k.add_trans("a", "a").add_trans("a", "a");
        let a = k.world("a").unwrap();
        assert_eq!(k.successors(a).len(), 1);

        k.add_val("p", "a").add_val("p", "a");
        assert_eq!(k.valuation("p").len(), 1);
    }

    #[test]
    fn test_undeclared_worlds_are_tracked_but_not_in_w() {
        let mut k = Kripke::new();
        k.add_world("a").add_trans("a", "x").add_val("p", "y");

        assert_eq!(k.worlds().len(), 1);
        assert!(!k.contains("x"));
        assert!(!k.contains("y"));

        // The edge is stored, but "x" is not a declared world.
        let a = k.world("a").unwrap();
        assert_eq!(k.successors(a).len(), 1);

        // The valuation entry for "y" is filtered out of W.
        assert!(k.valuation("p").is_empty());
    }

    #[test]
    fn test_blind_worlds() {
        let mut k = Kripke::new();
        k.add_worlds(["a", "b", "c"]).add_trans("a", "b");

        let blind = k.blind_worlds();
        assert_eq!(blind.len(), 2);
        assert!(blind.contains(k.world("b").unwrap()));
        assert!(blind.contains(k.world("c").unwrap()));
    }

    #[test]
    fn test_blind_worlds_cache_invalidation() {
        let mut k = Kripke::new();
        k.add_worlds(["a", "b"]);
        assert_eq!(k.blind_worlds().len(), 2);

        // Adding an edge must drop the cached set.
        k.add_trans("a", "b");
        assert_eq!(k.blind_worlds().len(), 1);

        // Adding a world must drop it as well.
        k.add_world("c");
        assert_eq!(k.blind_worlds().len(), 2);
    }

    #[test]
    fn test_display() {
        let mut k = Kripke::new();
        k.add_worlds(["w1", "w2"])
            .add_trans("w1", "w2")
            .add_vals("p", ["w2"]);

        assert_eq!(
            k.to_string(),
            "W    = {w1, w2}\nR    = {(w1, w2)}\nV(p) = {w2}"
        );
    }

    #[test]
    fn test_parse() {
        let text = "\
            # a three-world chain\n\
            W = {w1, w2, w3};\n\
            R = {(w1, w2), (w2, w3)}; # edges\n\
            V(p) = {w2, w3};\n\
            V(q) = {};\n\
        ";
        let k = Kripke::parse(text).unwrap();

        assert_eq!(k.worlds().len(), 3);
        let w1 = k.world("w1").unwrap();
        let w2 = k.world("w2").unwrap();
        assert!(k.successors(w1).contains(w2));
        assert_eq!(k.valuation("p").len(), 2);
        assert!(k.valuation("q").is_empty());
    }

    #[test]
    fn test_parse_accumulates_repeated_statements() {
        let k = Kripke::parse("W = {a}; W = {b}; R = {(a, b)}; R = {(b, a)};").unwrap();
        assert_eq!(k.worlds().len(), 2);
        let a = k.world("a").unwrap();
        let b = k.world("b").unwrap();
        assert!(k.successors(a).contains(b));
        assert!(k.successors(b).contains(a));
    }

    #[test]
    fn test_parse_statement_order_is_free() {
        let k = Kripke::parse("V(p) = {b}; R = {(a, b)}; W = {a, b};").unwrap();
        assert_eq!(k.worlds().len(), 2);
        assert_eq!(k.valuation("p").len(), 1);
    }

    #[test]
    fn test_from_reader() {
        let k = Kripke::from_reader("W = {a, b}; R = {(a, b)};".as_bytes()).unwrap();
        assert_eq!(k.worlds().len(), 2);
        assert_eq!(k.blind_worlds().len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(Kripke::parse(""), Err(ModelError::Empty)));
        assert!(matches!(
            Kripke::parse("# only comments\n   \n"),
            Err(ModelError::Empty)
        ));
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = Kripke::parse("W = {a};\nR = {(a b)};").unwrap_err();
        match err {
            ModelError::Unexpected { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = Kripke::parse("X = {a};").unwrap_err();
        assert!(matches!(err, ModelError::Unexpected { line: 1, .. }));

        let err = Kripke::parse("W = {a}").unwrap_err();
        assert!(matches!(err, ModelError::Unexpected { .. }));
    }
}
