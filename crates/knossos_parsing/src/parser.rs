//! Builds the AST of a module from its token tree

use crate::lexer::lex;
use crate::parser::context::ParseContext;
use crate::parser::error::{ErrorKind, ParseError, ParseResult};
use crate::parser::items::parse_block;
use crate::parser::signatures::SignatureRegistry;
use crate::parser::symbols::{RuleEntry, Symbols};
use knossos_ast::block::Block;
use knossos_ast::expr::{Declaration, Expr};
use knossos_ast::signature::Signature;
use knossos_ast::types::Type;
use knossos_tokens::spanned::Span;
use knossos_tokens::token::Token;
use std::path::Path;
use std::fs;
use tracing::{debug, instrument};

mod binding;
mod context;
pub mod error;
mod expr;
mod items;
pub mod keyword;
pub mod signatures;
pub mod symbols;
pub mod types;

pub use expr::parse_literal;

/// Parses a single module. The source is tokenised, then parsed once; declarations can be added
/// on the side at any time without touching the parsed tree.
///
/// # Examples
/// ```
/// # use knossos_parsing::Parser;
/// let mut parser = Parser::new("(edef f Float (Integer))\n(def g Float ((x : Integer)) (f x))");
/// let root = parser.parse().unwrap();
/// assert_eq!(root.len(), 2);
/// assert_eq!(parser.signatures().len(), 2);
/// ```
#[derive(Debug)]
pub struct Parser {
    source: String,
    root_token: Option<Token>,
    root: Option<Block>,
    extra_decls: Block,
    rules: Symbols<RuleEntry>,
    signatures: SignatureRegistry,
}

impl Parser {
    /// Creates a new parser over some source text
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            root_token: None,
            root: None,
            extra_decls: Block::empty(Span::start()),
            rules: Symbols::new(false),
            signatures: SignatureRegistry::new(),
        }
    }

    /// Creates a new parser over the contents of a file
    pub fn with_file(path: impl AsRef<Path>) -> ParseResult<Self> {
        let path = path.as_ref();
        debug!("reading {path:?}");
        let source = fs::read_to_string(path)?;
        Ok(Self::new(source))
    }

    /// The source being parsed
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Groups the source into a token tree. Only lexes once.
    pub fn tokenise(&mut self) -> ParseResult<&Token> {
        let root = match self.root_token.take() {
            Some(root) => root,
            None => lex(&self.source)?,
        };
        Ok(self.root_token.insert(root))
    }

    /// Parses the token tree into a block of top level expressions, tokenising first if needed.
    /// A parser can only parse once.
    #[instrument(skip(self), level = "debug")]
    pub fn parse(&mut self) -> ParseResult<&Block> {
        if self.root.is_some() {
            return Err(ParseError::new(ErrorKind::AlreadyParsed, None));
        }
        self.tokenise()?;
        let Some(root_token) = &self.root_token else {
            unreachable!("tokenise always sets the root token")
        };

        // a failed parse leaves the tables as they were
        let mut ctx = ParseContext::new(self.rules.clone(), self.signatures.clone());
        let block = parse_block(&mut ctx, root_token)?;
        self.rules = ctx.rules;
        self.signatures = ctx.signatures;

        debug!(
            "parsed {} top level forms, {} signatures, {} rules",
            block.len(),
            self.signatures.len(),
            self.rules.len()
        );
        Ok(self.root.insert(block))
    }

    /// The token tree, if the source has been tokenised
    pub fn root_token(&self) -> Option<&Token> {
        self.root_token.as_ref()
    }

    /// The parsed tree, if the source has been parsed
    pub fn root_node(&self) -> Option<&Block> {
        self.root.as_ref()
    }

    /// The declarations added with [`add_extra_decl`](Self::add_extra_decl)
    pub fn extra_decls(&self) -> &Block {
        &self.extra_decls
    }

    pub fn signatures(&self) -> &SignatureRegistry {
        &self.signatures
    }

    /// The rules registered while parsing
    pub fn rules(&self) -> &Symbols<RuleEntry> {
        &self.rules
    }

    /// Declares a function outside of the source. The declaration is added to
    /// [`extra_decls`](Self::extra_decls) and to the signatures, where an earlier registration of
    /// the same signature is kept.
    pub fn add_extra_decl(
        &mut self,
        name: impl Into<String>,
        param_types: impl IntoIterator<Item = Type>,
        return_type: Type,
    ) -> &Declaration {
        let signature = Signature::new(name, param_types);
        debug!("adding extra declaration {signature} -> {return_type}");
        self.signatures
            .declare(signature.clone(), return_type.clone(), Span::start());
        self.extra_decls
            .push(Declaration::new(Span::start(), signature, return_type));
        match self.extra_decls.statements().last() {
            Some(Expr::Declaration(decl)) => decl,
            _ => unreachable!("a declaration was just pushed"),
        }
    }

    /// Parses if needed, then gives up the parsed module
    pub fn into_module(mut self) -> ParseResult<Module> {
        if self.root.is_none() {
            self.parse()?;
        }
        Ok(Module {
            root: self.root.take().unwrap_or_default(),
            extra_decls: self.extra_decls,
            signatures: self.signatures,
        })
    }
}

/// A parsed module
#[derive(Debug)]
pub struct Module {
    pub root: Block,
    pub extra_decls: Block,
    pub signatures: SignatureRegistry,
}

/// Parses source text into a module
pub fn parse(source: &str) -> ParseResult<Module> {
    Parser::new(source).into_module()
}
