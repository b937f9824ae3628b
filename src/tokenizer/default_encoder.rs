use super::TokenEncoder;
use crate::document::{DocumentNode, NodeTypeId};

/// Token produced by `DefaultEncoder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Char(char),
    NodeStart(NodeTypeId),
    NodeEnd(NodeTypeId),
}

/// Compares characters and node types. Marks are ignored, so changing only
/// the formatting of some text doesn't show up in the diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultEncoder;

impl<N> TokenEncoder<N> for DefaultEncoder
where
    N: DocumentNode,
{
    type Token = Token;

    fn encode_character(&self, character: char, _marks: &[N::Mark]) -> Token {
        Token::Char(character)
    }

    fn encode_node_start(&self, node: &N) -> Token { Token::NodeStart(node.node_type_id()) }

    fn encode_node_end(&self, node: &N) -> Token { Token::NodeEnd(node.node_type_id()) }

    fn compare_tokens(&self, a: &Token, b: &Token) -> bool { a == b }
}
