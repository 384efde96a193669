//! Template source parser.
//!
//! Turns `{{name}}`, `{{#if name}}…{{/if}}` and `{{#each name}}…{{/each}}`
//! markup into a tree of [`Node`]s. Blocks nest when their markers balance;
//! an opener without a closer, or a closer without an opener, stays in the
//! output as literal text. Parsing never fails.

/// Parsed template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted as-is
    Text(String),
    /// `{{name}}`
    Placeholder(String),
    /// `{{#if name}}body{{/if}}`
    If { name: String, body: Vec<Node> },
    /// `{{#each name}}body{{/each}}`
    Each { name: String, body: Vec<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    If,
    Each,
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Placeholder(&'a str),
    Open { block: Block, name: &'a str, raw: &'a str },
    Close { block: Block, raw: &'a str },
}

/// An open block waiting for its closer
struct Frame {
    block: Block,
    name: String,
    opener: String,
    nodes: Vec<Node>,
}

impl Frame {
    fn close(self) -> Node {
        match self.block {
            Block::If => Node::If {
                name: self.name,
                body: self.nodes,
            },
            Block::Each => Node::Each {
                name: self.name,
                body: self.nodes,
            },
        }
    }

    /// Unclosed block: the opener is plain text, the body is kept in place
    fn into_literal(self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.push(Node::Text(self.opener));
        nodes.extend(self.nodes);
        nodes
    }
}

/// Parse template source into a node tree.
pub fn parse(source: &str) -> Vec<Node> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for token in tokenize(source) {
        match token {
            Token::Text(text) => emit(&mut stack, &mut root, Node::Text(text.to_string())),
            Token::Placeholder(name) => {
                emit(&mut stack, &mut root, Node::Placeholder(name.to_string()))
            }
            Token::Open { block, name, raw } => stack.push(Frame {
                block,
                name: name.to_string(),
                opener: raw.to_string(),
                nodes: Vec::new(),
            }),
            Token::Close { block, raw } => {
                let Some(pos) = stack.iter().rposition(|f| f.block == block) else {
                    emit(&mut stack, &mut root, Node::Text(raw.to_string()));
                    continue;
                };

                // Blocks opened after the matching one were never closed
                while stack.len() > pos + 1 {
                    if let Some(unclosed) = stack.pop() {
                        for node in unclosed.into_literal() {
                            emit(&mut stack, &mut root, node);
                        }
                    }
                }
                if let Some(frame) = stack.pop() {
                    emit(&mut stack, &mut root, frame.close());
                }
            }
        }
    }

    while let Some(unclosed) = stack.pop() {
        for node in unclosed.into_literal() {
            emit(&mut stack, &mut root, node);
        }
    }

    root
}

fn emit(stack: &mut [Frame], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(frame) => frame.nodes.push(node),
        None => root.push(node),
    }
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find("{{") {
        let open = cursor + offset;
        let tag = source[open + 2..]
            .find("}}")
            .and_then(|len| classify(&source[open..open + 2 + len + 2]));

        match tag {
            Some(token) => {
                if text_start < open {
                    tokens.push(Token::Text(&source[text_start..open]));
                }
                let end = open + token_len(&token);
                tokens.push(token);
                text_start = end;
                cursor = end;
            }
            // Not a tag: the first brace is text, retry from the next one
            None => cursor = open + 1,
        }
    }

    if text_start < source.len() {
        tokens.push(Token::Text(&source[text_start..]));
    }
    tokens
}

fn token_len(token: &Token<'_>) -> usize {
    match token {
        Token::Text(s) => s.len(),
        Token::Placeholder(name) => name.len() + 4,
        Token::Open { raw, .. } | Token::Close { raw, .. } => raw.len(),
    }
}

/// Classify a complete `{{…}}` tag
fn classify(raw: &str) -> Option<Token<'_>> {
    let inner = &raw[2..raw.len() - 2];

    match inner {
        "/if" => return Some(Token::Close { block: Block::If, raw }),
        "/each" => return Some(Token::Close { block: Block::Each, raw }),
        _ => {}
    }

    if let Some(name) = inner.strip_prefix("#if ") {
        return is_name(name).then_some(Token::Open { block: Block::If, name, raw });
    }
    if let Some(name) = inner.strip_prefix("#each ") {
        return is_name(name).then_some(Token::Open { block: Block::Each, name, raw });
    }

    is_name(inner).then_some(Token::Placeholder(inner))
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn var(s: &str) -> Node {
        Node::Placeholder(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("no tags here"), vec![text("no tags here")]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            parse("Hi {{name}}, see {{url}}"),
            vec![text("Hi "), var("name"), text(", see "), var("url")]
        );
    }

    #[test]
    fn test_invalid_tags_are_text() {
        assert_eq!(parse("{{not a name}}"), vec![text("{{not a name}}")]);
        assert_eq!(parse("{{}}"), vec![text("{{}}")]);
        assert_eq!(parse("{{open"), vec![text("{{open")]);
        assert_eq!(
            parse("{{{title}}}"),
            vec![text("{"), var("title"), text("}")]
        );
    }

    #[test]
    fn test_blocks() {
        assert_eq!(
            parse("{{#if a}}yes{{/if}}"),
            vec![Node::If {
                name: "a".to_string(),
                body: vec![text("yes")],
            }]
        );
        assert_eq!(
            parse("{{#each items}}- {{this}}{{/each}}"),
            vec![Node::Each {
                name: "items".to_string(),
                body: vec![text("- "), var("this")],
            }]
        );
    }

    #[test]
    fn test_nested_if_inside_each() {
        let nodes = parse("{{#each m}}{{label}}{{#if change}}({{change}}){{/if}}{{/each}}");
        assert_eq!(
            nodes,
            vec![Node::Each {
                name: "m".to_string(),
                body: vec![
                    var("label"),
                    Node::If {
                        name: "change".to_string(),
                        body: vec![text("("), var("change"), text(")")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_unclosed_opener_is_literal() {
        assert_eq!(
            parse("a{{#if x}}b{{y}}"),
            vec![text("a"), text("{{#if x}}"), text("b"), var("y")]
        );
    }

    #[test]
    fn test_stray_closer_is_literal() {
        assert_eq!(parse("a{{/each}}b"), vec![text("a"), text("{{/each}}"), text("b")]);
    }

    #[test]
    fn test_crossed_blocks() {
        // The inner each never closes before the outer if does
        let nodes = parse("{{#if a}}{{#each b}}x{{/if}}{{/each}}");
        assert_eq!(
            nodes,
            vec![
                Node::If {
                    name: "a".to_string(),
                    body: vec![text("{{#each b}}"), text("x")],
                },
                text("{{/each}}"),
            ]
        );
    }
}
