use super::*;

#[test]
fn required_text_input_reports_value_missing() -> Result<()> {
    let mut page = Page::from_html("<form id='f'><input id='name' required></form>")?;

    let validity = page.control_validity("#name")?;
    assert!(validity.value_missing);
    assert!(!validity.valid);

    page.type_text("#name", "ada")?;
    assert!(page.control_validity("#name")?.valid);
    Ok(())
}

#[test]
fn required_checkbox_must_be_checked() -> Result<()> {
    let mut page =
        Page::from_html("<form id='f'><input id='agree' type='checkbox' required></form>")?;

    assert!(page.control_validity("#agree")?.value_missing);
    page.set_checked("#agree", true)?;
    assert!(page.control_validity("#agree")?.valid);
    Ok(())
}

#[test]
fn required_radio_group_is_satisfied_by_any_member() -> Result<()> {
    let html = r#"
        <form id='f'>
          <input id='basic' type='radio' name='plan' value='basic' required>
          <input id='pro' type='radio' name='plan' value='pro' required>
        </form>
        "#;
    let mut page = Page::from_html(html)?;

    assert!(page.control_validity("#basic")?.value_missing);
    assert!(page.control_validity("#pro")?.value_missing);

    page.set_checked("#pro", true)?;
    assert!(page.control_validity("#basic")?.valid);
    assert!(page.control_validity("#pro")?.valid);
    Ok(())
}

#[test]
fn checking_a_radio_unchecks_its_group() -> Result<()> {
    let html = r#"
        <form id='f'>
          <input id='a' type='radio' name='plan'>
          <input id='b' type='radio' name='plan'>
        </form>
        "#;
    let mut page = Page::from_html(html)?;

    page.set_checked("#a", true)?;
    page.set_checked("#b", true)?;
    assert!(!page.control_validity("#a")?.value_missing);

    let a = page.select_one("#a")?;
    let b = page.select_one("#b")?;
    assert!(!page.dom.checked(a)?);
    assert!(page.dom.checked(b)?);
    Ok(())
}

#[test]
fn email_type_mismatch_follows_address_syntax() -> Result<()> {
    let mut page = Page::from_html("<form><input id='mail' type='email'></form>")?;

    for (input, expected_valid) in [
        ("grace@example.com", true),
        ("g.h+archive@sub.example.org", true),
        ("", true),
        ("not-an-address", false),
        ("two@@example.com", false),
        ("user@-example.com", false),
    ] {
        page.type_text("#mail", input)?;
        let validity = page.control_validity("#mail")?;
        assert_eq!(validity.valid, expected_valid, "input {input:?}");
        assert_eq!(validity.type_mismatch, !expected_valid, "input {input:?}");
    }
    Ok(())
}

#[test]
fn email_multiple_accepts_a_comma_separated_list() -> Result<()> {
    let mut page = Page::from_html("<form><input id='cc' type='email' multiple></form>")?;

    page.type_text("#cc", "a@example.com, b@example.org")?;
    assert!(page.control_validity("#cc")?.valid);

    page.type_text("#cc", "a@example.com, nope")?;
    assert!(page.control_validity("#cc")?.type_mismatch);
    Ok(())
}

#[test]
fn url_inputs_require_a_scheme() -> Result<()> {
    let mut page = Page::from_html("<form><input id='site' type='url'></form>")?;

    page.type_text("#site", "https://example.com/path")?;
    assert!(page.control_validity("#site")?.valid);

    page.type_text("#site", "example.com")?;
    assert!(page.control_validity("#site")?.type_mismatch);
    Ok(())
}

#[test]
fn pattern_matches_are_anchored_to_the_whole_value() -> Result<()> {
    let mut page = Page::from_html("<form><input id='pin' pattern='[0-9]{4}'></form>")?;

    page.type_text("#pin", "1234")?;
    assert!(page.control_validity("#pin")?.valid);

    page.type_text("#pin", "12345")?;
    assert!(page.control_validity("#pin")?.pattern_mismatch);

    page.type_text("#pin", "12a4")?;
    assert!(page.control_validity("#pin")?.pattern_mismatch);
    Ok(())
}

#[test]
fn length_constraints_count_characters() -> Result<()> {
    let mut page =
        Page::from_html("<form><input id='nick' minlength='2' maxlength='4'></form>")?;

    // Length limits only apply once the field has a value.
    assert!(page.control_validity("#nick")?.valid);

    page.type_text("#nick", "é")?;
    assert!(page.control_validity("#nick")?.too_short);

    page.type_text("#nick", "éé")?;
    assert!(page.control_validity("#nick")?.valid);

    page.type_text("#nick", "ééééé")?;
    assert!(page.control_validity("#nick")?.too_long);
    Ok(())
}

#[test]
fn number_inputs_check_range_step_and_syntax() -> Result<()> {
    let mut page = Page::from_html(
        "<form><input id='shares' type='number' min='1' max='100' step='5'></form>",
    )?;

    page.type_text("#shares", "6")?;
    assert!(page.control_validity("#shares")?.valid);

    page.type_text("#shares", "0")?;
    assert!(page.control_validity("#shares")?.range_underflow);

    page.type_text("#shares", "105")?;
    assert!(page.control_validity("#shares")?.range_overflow);

    page.type_text("#shares", "7")?;
    assert!(page.control_validity("#shares")?.step_mismatch);

    page.type_text("#shares", "lots")?;
    assert!(page.control_validity("#shares")?.bad_input);
    Ok(())
}

#[test]
fn step_any_disables_the_step_check() -> Result<()> {
    let mut page =
        Page::from_html("<form><input id='n' type='number' min='0' step='any'></form>")?;
    page.type_text("#n", "0.37")?;
    assert!(page.control_validity("#n")?.valid);
    Ok(())
}

#[test]
fn required_select_needs_a_value() -> Result<()> {
    let html = r#"
        <form id='f'>
          <select id='plan' required>
            <option value=''>choose</option>
            <option value='basic'>basic</option>
          </select>
        </form>
        "#;
    let mut page = Page::from_html(html)?;

    assert!(page.control_validity("#plan")?.value_missing);
    page.set_value("#plan", "basic")?;
    assert!(page.control_validity("#plan")?.valid);
    Ok(())
}

#[test]
fn textarea_honours_required_and_length() -> Result<()> {
    let mut page = Page::from_html(
        "<form><textarea id='bio' required minlength='3'></textarea></form>",
    )?;

    assert!(page.control_validity("#bio")?.value_missing);
    page.type_text("#bio", "hi")?;
    assert!(page.control_validity("#bio")?.too_short);
    page.type_text("#bio", "hi there")?;
    assert!(page.control_validity("#bio")?.valid);
    Ok(())
}

#[test]
fn custom_validity_blocks_until_cleared() -> Result<()> {
    let mut page = Page::from_html("<form id='f' novalidate class='needs-validation'><input id='name' value='ok'></form>")?;
    page.install_page_behaviors()?;
    page.fire_load()?;

    page.set_custom_validity("#name", "taken")?;
    assert!(page.control_validity("#name")?.custom_error);
    let blocked = page.submit("#f")?;
    assert!(blocked.default_prevented);

    page.set_custom_validity("#name", "")?;
    let allowed = page.submit("#f")?;
    assert!(!allowed.default_prevented);
    Ok(())
}

#[test]
fn disabled_controls_never_block_submission() -> Result<()> {
    let html = r#"
        <form id='f'>
          <input id='ghost' required disabled>
          <fieldset disabled>
            <input id='nested' required>
          </fieldset>
        </form>
        "#;
    let page = Page::from_html(html)?;

    assert!(page.control_validity("#ghost")?.valid);
    assert!(page.control_validity("#nested")?.valid);
    assert!(page.form_is_valid("#f")?);
    Ok(())
}

#[test]
fn non_participating_input_types_are_always_valid() -> Result<()> {
    let html = r#"
        <form id='f'>
          <input id='token' type='hidden' required>
          <button id='go' type='submit'>go</button>
        </form>
        "#;
    let page = Page::from_html(html)?;

    assert!(page.control_validity("#token")?.valid);
    assert!(page.form_is_valid("#f")?);
    Ok(())
}

#[test]
fn native_gating_blocks_invalid_forms_without_novalidate() -> Result<()> {
    let mut page =
        Page::from_html("<form id='strict'><input id='q' required></form>")?;
    page.install_page_behaviors()?;
    page.fire_load()?;

    let outcome = page.submit("#strict")?;
    assert!(!outcome.fired);
    assert!(page.submissions().is_empty());

    page.type_text("#q", "term")?;
    let outcome = page.submit("#strict")?;
    assert!(outcome.fired);
    assert_eq!(page.submissions(), ["#strict"]);
    Ok(())
}

#[test]
fn readonly_required_text_does_not_report_value_missing() -> Result<()> {
    let page = Page::from_html("<form><input id='frozen' required readonly></form>")?;
    assert!(page.control_validity("#frozen")?.valid);
    Ok(())
}
