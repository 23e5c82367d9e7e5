use page_guard::{FLASH_DISMISS_DELAY_MS, Page, WAS_VALIDATED_CLASS};
use proptest::prelude::*;
use proptest::test_runner::FileFailurePersistence;

const DEFAULT_FUZZ_CASES: u32 = 64;

const SIGNUP_FIXTURE: &str = r#"
<form id='signup' class='needs-validation' novalidate action='/register' method='post'>
  <input id='name' name='name' type='text' required>
  <input id='agree' name='agree' type='checkbox' required>
  <button id='send' type='submit'>Send</button>
</form>
<div class='alert alert-success'>Registered!</div>
"#;

#[derive(Clone, Debug)]
enum PageAction {
    TypeName(String),
    SetAgree(bool),
    Submit,
    Advance(i64),
}

fn page_action() -> impl Strategy<Value = PageAction> {
    prop_oneof![
        proptest::string::string_regex("[a-z]{0,6}")
            .expect("valid strategy regex")
            .prop_map(PageAction::TypeName),
        any::<bool>().prop_map(PageAction::SetAgree),
        Just(PageAction::Submit),
        (0i64..2000).prop_map(PageAction::Advance),
    ]
}

fn fuzz_cases() -> u32 {
    std::env::var("PAGE_GUARD_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_FUZZ_CASES)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: fuzz_cases(),
        failure_persistence: Some(Box::new(FileFailurePersistence::Off)),
        .. ProptestConfig::default()
    })]

    #[test]
    fn guard_and_dismissal_invariants_hold(
        actions in proptest::collection::vec(page_action(), 0..24),
    ) {
        let mut page = Page::from_html(SIGNUP_FIXTURE).unwrap();
        page.install_page_behaviors().unwrap();
        page.fire_load().unwrap();

        let mut name = String::new();
        let mut agree = false;
        let mut submitted = false;

        for action in actions {
            match action {
                PageAction::TypeName(text) => {
                    page.type_text("#name", &text).unwrap();
                    name = text;
                }
                PageAction::SetAgree(checked) => {
                    page.set_checked("#agree", checked).unwrap();
                    agree = checked;
                }
                PageAction::Submit => {
                    let expected_valid = !name.is_empty() && agree;
                    let outcome = page.submit("#signup").unwrap();
                    prop_assert!(outcome.fired);
                    prop_assert_eq!(outcome.default_prevented, !expected_valid);
                    prop_assert_eq!(outcome.propagation_stopped, !expected_valid);
                    prop_assert!(page.has_class("#signup", WAS_VALIDATED_CLASS).unwrap());
                    submitted = true;
                }
                PageAction::Advance(delta) => {
                    page.advance_time(delta).unwrap();
                }
            }
            // The banner exists exactly until the dismissal delay elapses.
            prop_assert_eq!(
                page.exists(".alert").unwrap(),
                page.now_ms() < FLASH_DISMISS_DELAY_MS
            );
        }

        if !submitted {
            prop_assert!(!page.has_class("#signup", WAS_VALIDATED_CLASS).unwrap());
        }

        page.flush().unwrap();
        prop_assert!(!page.exists(".alert").unwrap());
    }
}
