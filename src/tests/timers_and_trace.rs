use super::*;

#[test]
fn timers_fire_in_due_then_registration_order() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    let fired = Rc::new(RefCell::new(Vec::new()));

    for (label, delay) in [("slow", 20), ("fast", 10), ("also-fast", 10)] {
        let fired = Rc::clone(&fired);
        page.schedule(delay, move || fired.borrow_mut().push(label));
    }

    page.advance_time(10)?;
    assert_eq!(*fired.borrow(), ["fast", "also-fast"]);

    page.advance_time(10)?;
    assert_eq!(*fired.borrow(), ["fast", "also-fast", "slow"]);
    Ok(())
}

#[test]
fn pending_timers_are_sorted_and_clearable() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    let second = page.schedule(50, || {});
    let first = page.schedule(10, || {});

    let pending = page.pending_timers();
    assert_eq!(
        pending.iter().map(|timer| timer.id).collect::<Vec<_>>(),
        [first, second]
    );

    assert!(page.clear_timer(second));
    assert!(!page.clear_timer(second));
    assert_eq!(page.pending_timers().len(), 1);
    Ok(())
}

#[test]
fn advance_time_rejects_negative_deltas() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    assert!(matches!(
        page.advance_time(-1),
        Err(Error::PageRuntime(_))
    ));
    Ok(())
}

#[test]
fn advance_time_to_moves_the_clock_forward_only() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    page.advance_time_to(500)?;
    assert_eq!(page.now_ms(), 500);
    assert!(page.advance_time_to(499).is_err());
    Ok(())
}

#[test]
fn flush_runs_everything_and_advances_the_clock() -> Result<()> {
    let mut page = Page::from_html("<div class='alert'>hi</div>")?;
    page.install_page_behaviors()?;
    let ran = Rc::new(RefCell::new(0usize));
    let ran_hook = Rc::clone(&ran);
    page.schedule(5000, move || *ran_hook.borrow_mut() += 1);

    page.flush()?;
    assert_eq!(page.now_ms(), 5000);
    assert_eq!(*ran.borrow(), 1);
    page.assert_not_exists(".alert")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn run_next_timer_steps_one_task_at_a_time() -> Result<()> {
    let mut page = Page::from_html("<p></p>")?;
    let fired = Rc::new(RefCell::new(Vec::new()));
    for (label, delay) in [("b", 200), ("a", 100)] {
        let fired = Rc::clone(&fired);
        page.schedule(delay, move || fired.borrow_mut().push(label));
    }

    assert!(page.run_next_timer()?);
    assert_eq!(page.now_ms(), 100);
    assert_eq!(*fired.borrow(), ["a"]);

    assert!(page.run_next_timer()?);
    assert!(!page.run_next_timer()?);
    assert_eq!(*fired.borrow(), ["a", "b"]);
    Ok(())
}

#[test]
fn trace_records_guard_and_timer_activity() -> Result<()> {
    let html = r#"
        <form id='f' class='needs-validation' novalidate>
          <input id='q' required>
        </form>
        <div class='alert'>hi</div>
        "#;
    let mut page = Page::from_html(html)?;
    page.set_trace_enabled(true);
    page.set_trace_to_stderr(false);

    page.install_page_behaviors()?;
    page.fire_load()?;
    page.submit("#f")?;
    page.advance_time(FLASH_DISMISS_DELAY_MS)?;

    let logs = page.trace_logs();
    assert!(logs.iter().any(|line| line.contains("[event] guard_install count=1")));
    assert!(logs
        .iter()
        .any(|line| line.contains("[event] validation_guard target=form#f valid=false")));
    assert!(logs.iter().any(|line| line.contains("[timer] flash_dismiss")));
    assert!(logs.iter().any(|line| line.starts_with("[timer] advance")));
    Ok(())
}

#[test]
fn trace_is_silent_when_disabled() -> Result<()> {
    let mut page = Page::from_html("<div class='alert'>hi</div>")?;
    page.install_page_behaviors()?;
    page.advance_time(FLASH_DISMISS_DELAY_MS)?;
    assert!(page.trace_logs().is_empty());
    Ok(())
}
