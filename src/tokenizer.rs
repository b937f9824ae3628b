use crate::document::DocumentNode;

pub mod default_encoder;

/// Turns document content into the tokens the diff compares.
pub trait TokenEncoder<N>
where
    N: DocumentNode,
{
    type Token;

    fn encode_character(&self, character: char, marks: &[N::Mark]) -> Self::Token;

    /// Token of a leaf, or of the opening boundary of a node with content.
    fn encode_node_start(&self, node: &N) -> Self::Token;

    fn encode_node_end(&self, node: &N) -> Self::Token;

    fn compare_tokens(&self, a: &Self::Token, b: &Self::Token) -> bool;
}

/// Appends one token per position of `fragment` between `start` and `end` to
/// `out`.
///
/// A node cut by the range contributes only its visible content: its opening
/// token is emitted only if the range includes the node's start, and its
/// closing token only if the range includes its end.
pub fn tokenize_fragment<N, E>(
    fragment: &[N],
    encoder: &E,
    start: usize,
    end: usize,
    out: &mut Vec<E::Token>,
) where
    N: DocumentNode,
    E: TokenEncoder<N>,
{
    let mut offset = 0;

    for child in fragment {
        if offset >= end {
            break;
        }

        let child_end = offset + child.node_size();
        let from = start.max(offset);
        let to = end.min(child_end);

        if from < to {
            if child.is_text() {
                out.extend(
                    child
                        .text()
                        .chars()
                        .skip(from - offset)
                        .take(to - from)
                        .map(|character| encoder.encode_character(character, child.marks())),
                );
            } else if child.is_leaf() {
                out.push(encoder.encode_node_start(child));
            } else {
                if from == offset {
                    out.push(encoder.encode_node_start(child));
                }

                tokenize_fragment(
                    child.children(),
                    encoder,
                    from.max(offset + 1) - offset - 1,
                    to.min(child_end - 1) - offset - 1,
                    out,
                );

                if to == child_end {
                    out.push(encoder.encode_node_end(child));
                }
            }
        }

        offset = child_end;
    }
}
