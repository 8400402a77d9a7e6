use opsdesk_markdown::{escape_text, render, render_untrusted};

#[test]
fn emphasis_nests_and_code_spans_stay_literal() {
    let html = render("**bold *italic* bold** and `x**2*y`");
    assert_eq!(
        html,
        "<span><strong>bold <em>italic</em> bold</strong> and <code>x**2*y</code></span>"
    );
}

#[test]
fn fenced_block_contents_are_escaped_and_untouched() {
    let html = render("```\n**not bold**\n# not a header\n<script>\n```");
    assert_eq!(
        html,
        "<pre><code>**not bold**\n# not a header\n&lt;script&gt;</code></pre>"
    );
    assert!(!html.contains("<strong>"));
    assert!(!html.contains("<h1>"));
}

#[test]
fn fenced_block_with_language_tag() {
    let html = render("Query:\n```sql\nSELECT * FROM orders WHERE qty > 5;\n```\nRun it.");
    assert_eq!(
        html,
        r#"Query:<pre><code class="language-sql">SELECT * FROM orders WHERE qty &gt; 5;</code></pre>Run it."#
    );
}

#[test]
fn image_renders_as_img_not_link() {
    let html = render("![alt](a.png)");
    assert_eq!(html, r#"<span><img src="a.png" alt="alt"></span>"#);
    assert!(!html.contains("<a "));
}

#[test]
fn ordered_list_keeps_order() {
    assert_eq!(
        render("1. first\n2. second"),
        "<ol><li>first</li><li>second</li></ol>"
    );
}

#[test]
fn headers_one_through_four() {
    assert_eq!(
        render("# A\n## B\n### C\n#### D"),
        "<h1>A</h1><h2>B</h2><h3>C</h3><h4>D</h4>"
    );
}

#[test]
fn table_with_inline_markdown_in_cells() {
    let html = render(
        "| Line | Status |\n|------|--------|\n| Press 1 | **down** |\n| Press 2 | `ok` |",
    );
    assert_eq!(
        html,
        "<table><thead><tr><th>Line</th><th>Status</th></tr></thead><tbody>\
         <tr><td>Press 1</td><td><strong>down</strong></td></tr>\
         <tr><td>Press 2</td><td><code>ok</code></td></tr></tbody></table>"
    );
}

#[test]
fn table_without_body_rows() {
    assert_eq!(
        render("| a | b |\n| --- | --- |"),
        "<table><thead><tr><th>a</th><th>b</th></tr></thead><tbody></tbody></table>"
    );
}

#[test]
fn malformed_table_is_literal() {
    assert_eq!(render("| a | b |"), "<span>| a | b |</span>");
}

#[test]
fn link_and_mixed_plan() {
    let html = render(
        "### Plan\n1. Check [stock](/stock?sku=A1)\n2. Schedule **press 3**\n\nApprove to continue.",
    );
    assert_eq!(
        html,
        r#"<h3>Plan</h3><ol><li>Check <a href="/stock?sku=A1">stock</a></li><li>Schedule <strong>press 3</strong></li></ol>Approve to continue."#
    );
}

#[test]
fn raw_html_passes_through_unless_sanitized() {
    let raw = "hi <img src=x onerror=alert(1)>";
    assert_eq!(render(raw), "<span>hi <img src=x onerror=alert(1)></span>");
    assert_eq!(render_untrusted(raw), "<span>hi <img></span>");
}

#[test]
fn user_text_is_escaped_not_rendered() {
    assert_eq!(escape_text("**hi** <b>"), "**hi** &lt;b&gt;");
}

#[test]
fn bold_italic_produces_well_nested_tags() {
    assert_eq!(
        render("***urgent***"),
        "<span><strong><em>urgent</em></strong></span>"
    );
    assert_eq!(
        render("*a **b* c**"),
        "<span>*a <strong>b* c</strong></span>"
    );
}

#[test]
fn sanitizer_refuses_entity_encoded_javascript_links() {
    let html = render_untrusted(
        r#"<a href="javascript&#58;alert(1)">click</a> and [ok](/orders?id=7&page=2)"#,
    );
    assert!(!html.contains("javascript"));
    assert!(html.contains(r#"<a href="/orders?id=7&amp;page=2">ok</a>"#));
}
