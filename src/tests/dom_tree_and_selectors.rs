use super::*;

#[test]
fn parses_nested_markup_with_voids_comments_and_doctype() -> Result<()> {
    let html = r#"
        <!doctype html>
        <!-- navigation -->
        <div id='wrap'>
          <form id='login' class='needs-validation' novalidate>
            <label for='user'>User</label>
            <input id='user' name='user' required>
            <br>
            <button type='submit'>Sign in</button>
          </form>
        </div>
        "#;
    let page = Page::from_html(html)?;

    page.assert_exists("#wrap")?;
    page.assert_exists("#login")?;
    page.assert_text("label", "User")?;
    assert!(page.has_class("#login", "needs-validation")?);
    assert_eq!(page.query_count("input")?, 1);
    Ok(())
}

#[test]
fn character_references_decode_in_text_and_attributes() -> Result<()> {
    let html = r#"<p id='msg' title='a &amp; b'>5 &lt; 6 &amp; 7 &gt; 2</p>"#;
    let page = Page::from_html(html)?;

    page.assert_text("#msg", "5 < 6 & 7 > 2")?;
    let msg = page.select_one("#msg")?;
    assert_eq!(page.dom.attr(msg, "title").as_deref(), Some("a & b"));
    Ok(())
}

#[test]
fn unterminated_comment_is_a_parse_error() {
    let result = Page::from_html("<div><!-- oops");
    assert!(matches!(result, Err(Error::HtmlParse(_))));
}

#[test]
fn implicit_close_recovers_from_missing_end_tags() -> Result<()> {
    let html = "<div id='a'><p id='b'>text</div><p id='c'>after</p>";
    let page = Page::from_html(html)?;

    // </div> closes the still-open <p> inside it; the second <p> is a
    // sibling of the div, not a child.
    page.assert_exists("#a > #b")?;
    page.assert_not_exists("#a #c")?;
    page.assert_exists("#c")?;
    Ok(())
}

#[test]
fn duplicate_ids_resolve_to_the_first_element() -> Result<()> {
    let html = "<p id='dup' class='first'></p><p id='dup' class='second'></p>";
    let page = Page::from_html(html)?;

    assert!(page.has_class("#dup", "first")?);
    Ok(())
}

#[test]
fn selector_groups_and_combinators_match() -> Result<()> {
    let html = r#"
        <div id='outer'>
          <form class='needs-validation'><input type='email' name='a'></form>
        </div>
        <form id='bare'><input type='text' name='b'></form>
        <div class='alert alert-danger' data-kind='flash'>warn</div>
        "#;
    let page = Page::from_html(html)?;

    assert_eq!(page.query_count("form, .alert")?, 3);
    assert_eq!(page.query_count("#outer > form")?, 1);
    assert_eq!(page.query_count("#outer input")?, 1);
    assert_eq!(page.query_count("input[type=email]")?, 1);
    assert_eq!(page.query_count("[data-kind='flash']")?, 1);
    assert_eq!(page.query_count("div.alert.alert-danger")?, 1);
    assert_eq!(page.query_count("*")?, 6);
    Ok(())
}

#[test]
fn unsupported_selector_syntax_is_rejected() -> Result<()> {
    let page = Page::from_html("<p></p>")?;

    assert!(matches!(
        page.query_count("p:first-child"),
        Err(Error::UnsupportedSelector(_))
    ));
    assert!(matches!(
        page.query_count("p + p"),
        Err(Error::UnsupportedSelector(_))
    ));
    assert!(matches!(
        page.query_count(""),
        Err(Error::UnsupportedSelector(_))
    ));
    Ok(())
}

#[test]
fn missing_selector_reports_selector_not_found() -> Result<()> {
    let page = Page::from_html("<p id='only'></p>")?;
    assert!(matches!(
        page.text("#missing"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}

#[test]
fn class_mutations_round_trip() -> Result<()> {
    let mut page = Page::from_html("<div id='box' class='a b'></div>")?;
    let node = page.select_one("#box")?;

    page.dom.class_add(node, "c")?;
    assert_eq!(page.class_list("#box")?, ["a", "b", "c"]);

    page.dom.class_add(node, "b")?;
    assert_eq!(page.class_list("#box")?, ["a", "b", "c"]);

    page.dom.class_remove(node, "a")?;
    assert_eq!(page.class_list("#box")?, ["b", "c"]);
    Ok(())
}

#[test]
fn removing_a_node_detaches_its_subtree() -> Result<()> {
    let mut page = Page::from_html(
        "<div id='parent'><span id='child'>x</span></div><p id='after'>y</p>",
    )?;
    let parent = page.select_one("#parent")?;

    page.dom.remove_node(parent)?;
    page.assert_not_exists("#parent")?;
    page.assert_not_exists("#child")?;
    page.assert_exists("#after")?;

    // Detached nodes remove as a no-op.
    page.dom.remove_node(parent)?;
    Ok(())
}

#[test]
fn text_content_concatenates_descendant_text() -> Result<()> {
    let page = Page::from_html("<div id='d'><b>bold</b> and <i>italic</i></div>")?;
    page.assert_text("#d", "bold and italic")?;
    Ok(())
}

#[test]
fn dump_dom_serializes_the_subtree() -> Result<()> {
    let page = Page::from_html("<div id='d'><input type='text' name='q'></div>")?;
    let dump = page.dump_dom("#d")?;
    assert!(dump.starts_with("<div id=\"d\">"));
    assert!(dump.contains("<input"));
    assert!(dump.contains("name=\"q\""));
    Ok(())
}

#[test]
fn script_and_style_content_is_discarded() -> Result<()> {
    let html = r#"
        <p id='before'>seen</p>
        <script>var x = '<div id="fake"></div>';</script>
        <style>.alert { color: red; }</style>
        <p id='after'>also seen</p>
        "#;
    let page = Page::from_html(html)?;

    page.assert_exists("#before")?;
    page.assert_exists("#after")?;
    page.assert_not_exists("#fake")?;
    assert_eq!(page.query_count("p")?, 2);
    Ok(())
}
