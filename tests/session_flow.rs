//! End-to-end sessions driven through the app loop with scripted input.

use cf_shell::{
    App, Category, CommandOutcome, DisplayConfig, ExitReason, InlineRenderer, ScriptedSource,
    Theme,
};

fn run_script(source: ScriptedSource) -> App<ScriptedSource, Vec<u8>> {
    let renderer = InlineRenderer::new(DisplayConfig::default(), Theme::default()).with_width(100);
    let mut app = App::new(renderer, source, Vec::new());
    assert_eq!(app.run().unwrap(), ExitReason::EndOfInput);
    app
}

fn last_frame(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output).to_string();
    // Every frame opens a synchronized update
    let start = text.rfind("\x1b[?2026h").unwrap_or(0);
    text[start..].to_string()
}

#[test]
fn test_typing_help_shows_command_list() {
    let app = run_script(ScriptedSource::keystrokes("help\r"));

    assert_eq!(app.session().outcome(), Some(&CommandOutcome::HelpText));
    assert_eq!(app.session().buffer(), "");

    let frame = last_frame(app.output());
    assert!(frame.contains("cf status, cf list, help, clear"));
}

#[test]
fn test_cf_list_is_informational() {
    let app = run_script(ScriptedSource::keystrokes("cf list\r"));

    let outcome = app.session().outcome().unwrap();
    assert_eq!(outcome, &CommandOutcome::ListResult);
    assert_eq!(outcome.category(), Some(Category::Informational));

    let frame = last_frame(app.output());
    assert!(frame.contains("example.com"));
    assert!(frame.contains("test.com"));
}

#[test]
fn test_unknown_command_echoes_input() {
    let app = run_script(ScriptedSource::keystrokes("xyz\r"));

    assert_eq!(
        app.session().outcome(),
        Some(&CommandOutcome::Unknown("xyz".to_string()))
    );
    let frame = last_frame(app.output());
    assert!(frame.contains("Unknown command: xyz"));
}

#[test]
fn test_status_then_clear_removes_message() {
    let app = run_script(ScriptedSource::keystrokes("cf status\rclear\r"));

    assert_eq!(app.session().render_state().message(), None);
    let frame = last_frame(app.output());
    assert!(!frame.contains("Cloudflare service is healthy"));
}

#[test]
fn test_buffer_is_drawn_while_typing() {
    let app = run_script(ScriptedSource::keystrokes("cf sta"));

    assert_eq!(app.session().buffer(), "cf sta");
    assert!(app.session().outcome().is_none());
    assert!(last_frame(app.output()).contains("cf sta"));
}

#[test]
fn test_pasted_block_and_crlf() {
    let app = run_script(ScriptedSource::new(["cf status\r\nhel", "p\r\n"]));
    assert_eq!(app.session().outcome(), Some(&CommandOutcome::HelpText));
    assert_eq!(app.session().buffer(), "");
}

#[test]
fn test_backspace_correction() {
    let app = run_script(ScriptedSource::new(["cf lsit", "\x7f\x7f\x7f", "ist", "\r"]));
    assert_eq!(app.session().outcome(), Some(&CommandOutcome::ListResult));
}

#[test]
fn test_undecodable_chunk_is_skipped() {
    let app = run_script(ScriptedSource::new([&b"he"[..], &b"\xfe\xff"[..], &b"lp\r"[..]]));
    assert_eq!(app.session().outcome(), Some(&CommandOutcome::HelpText));
}

#[test]
fn test_utf8_split_across_chunks() {
    let euro = "€".as_bytes();
    let app = run_script(ScriptedSource::new([&euro[..1], &euro[1..], &b"\r"[..]]));
    assert_eq!(
        app.session().outcome(),
        Some(&CommandOutcome::Unknown("€".to_string()))
    );
}

#[test]
fn test_crlf_split_across_reads() {
    let app = run_script(ScriptedSource::new(["help\r", "\n"]));
    assert_eq!(app.session().outcome(), Some(&CommandOutcome::HelpText));
}

#[test]
fn test_alt_bracket_then_command() {
    // Alt+[ followed by a pause: the next key must not be taken as part of it
    let app = run_script(ScriptedSource::new(["\x1b[", "", "cf status\r"]));
    assert_eq!(app.session().outcome(), Some(&CommandOutcome::StatusOk));
}
