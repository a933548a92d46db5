//! XML rendering of the canonical tree

use crate::node::Node;

/// Serialize a node tree to an XML string
pub fn to_xml(node: &Node) -> String {
    let mut output = String::new();
    render_node(node, &mut output);
    output
}

fn render_node(node: &Node, output: &mut String) {
    output.push('<');
    output.push_str(&node.name);

    for (key, value) in node.attrib.iter() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_xml(value));
        output.push('"');
    }

    if node.children.is_empty() && node.text.is_none() {
        output.push_str("/>");
        return;
    }

    output.push('>');
    if let Some(text) = &node.text {
        output.push_str(&escape_xml(text));
    }
    for child in &node.children {
        render_node(child, output);
    }
    output.push_str("</");
    output.push_str(&node.name);
    output.push('>');
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_self_closing() {
        let node = Node::new("Options");
        assert_eq!(to_xml(&node), "<Options/>");
    }

    #[test]
    fn test_render_attributes_in_order() {
        let node = Node::new("Quiz")
            .with_attr("Id", "p1")
            .with_attr("Sentence", "2+2=?");
        assert_eq!(to_xml(&node), r#"<Quiz Id="p1" Sentence="2+2=?"/>"#);
    }

    #[test]
    fn test_render_escapes_attribute_values() {
        let node = Node::new("Option").with_attr("Sentence", "a < b & \"c\"");
        assert_eq!(
            to_xml(&node),
            r#"<Option Sentence="a &lt; b &amp; &quot;c&quot;"/>"#
        );
    }

    #[test]
    fn test_render_text_before_children() {
        let mut node = Node::new("Content").with_text("x & y");
        node.push(Node::new("Link").with_attr("url", "/a"));
        assert_eq!(to_xml(&node), r#"<Content>x &amp; y<Link url="/a"/></Content>"#);
    }

    #[test]
    fn test_render_nested() {
        let mut options = Node::new("Options");
        options.push(
            Node::new("Option")
                .with_attr("Sentence", "A")
                .with_attr("IsCorrectAnswer", "true"),
        );
        options.push(Node::new("Option").with_attr("Sentence", "B"));
        let mut quiz = Node::new("Quiz").with_attr("Id", "p1");
        quiz.push(options);

        assert_eq!(
            to_xml(&quiz),
            concat!(
                r#"<Quiz Id="p1">"#,
                r#"<Options>"#,
                r#"<Option Sentence="A" IsCorrectAnswer="true"/>"#,
                r#"<Option Sentence="B"/>"#,
                r#"</Options>"#,
                r#"</Quiz>"#
            )
        );
    }
}
