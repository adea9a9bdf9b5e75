//! Token grammar of the template definition language: model, view and
//! service files with embedded host-language expressions and markup
//! fragments.
//!
//! The registration order is load-bearing. Keywords precede the
//! identifier rule so that a keyword lexeme resolves to its keyword kind
//! through the tie-break, while any longer word (`schemax`) still lexes as
//! an identifier through longest match. Whitespace is registered last, as
//! trivia.

use crate::error::BuildError;
use crate::lexer::{CompiledLexer, LexerBuilder, TokenKind};

/// Tokens of the template definition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateToken {
    Schema,
    Partial,
    Repo,
    Service,
    Json,
    State,
    Interface,
    Ident,
    LCurly,
    RCurly,
    LParen,
    RParen,
    Comma,
    Splat,
    Assign,
    Arrow,
    /// `<>` — opens a markup fragment.
    LFragment,
    /// `</>` — closes a markup fragment.
    RFragment,
    /// `<">` — opens a multiline text block.
    LMultiLine,
    /// `</">` — closes a multiline text block.
    RMultiLine,
    Bar,
    Whitespace,
}

impl TokenKind for TemplateToken {
    fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

/// Builds the tokenizer for template definition files.
///
/// Identifiers cover qualified host-language type names (`List<int>`,
/// `string[]`, `Data.Row?`): a word starts with letters or underscores and
/// may continue with a tail that also allows digits and the type
/// characters `< > [ ] . ?`.
///
/// # Errors
///
/// Fails only if one of the built-in patterns is rejected, which would be
/// a defect in this module rather than in user input.
pub fn lexer() -> Result<CompiledLexer<TemplateToken>, BuildError> {
    let letters = "a|b|c|d|e|f|g|h|i|j|k|l|m|n|o|p|q|r|s|t|u|v|w|x|y|z";
    let cap_letters = letters.to_uppercase();
    let numbers = "0|1|2|3|4|5|6|7|8|9";
    let type_chars = "\\<|\\>|\\[|\\]|\\.|\\?";
    let word = format!(
        "({letters}|{cap_letters}|_)+(|({letters}|{cap_letters}|{numbers}|{type_chars}|_)+)"
    );

    LexerBuilder::new()
        .token(TemplateToken::Schema, "schema")
        .token(TemplateToken::Partial, "partial")
        .token(TemplateToken::Repo, "repo")
        .token(TemplateToken::Service, "service")
        .token(TemplateToken::Json, "json")
        .token(TemplateToken::State, "state")
        .token(TemplateToken::Interface, "interface")
        .token(TemplateToken::Ident, &word)
        .token(TemplateToken::LCurly, "{")
        .token(TemplateToken::RCurly, "}")
        .token(TemplateToken::LParen, "\\(")
        .token(TemplateToken::RParen, "\\)")
        .token(TemplateToken::Comma, ",")
        .token(TemplateToken::Splat, "...")
        .token(TemplateToken::Assign, "=")
        .token(TemplateToken::Arrow, "=>")
        .token(TemplateToken::LFragment, "<>")
        .token(TemplateToken::RFragment, "</>")
        .token(TemplateToken::LMultiLine, "<\">")
        .token(TemplateToken::RMultiLine, "</\">")
        .token(TemplateToken::Bar, "\\|")
        .token(TemplateToken::Whitespace, "( |\n|\r|\t)+")
        .build()
}
