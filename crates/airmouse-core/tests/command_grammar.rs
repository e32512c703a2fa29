//! Integration tests for the command grammar and the motion domain.
//!
//! These tests drive `parse_command` and `MotionScaler` together through the
//! public API, the same way the server's dispatcher does.

use airmouse_core::{
    parse_command, Command, KeyName, MotionConfig, MotionScaler, ParseError, ScrollDirection,
};

/// Runs a sequence of lines through the parser and a scaler, collecting the
/// motion that would be injected.
fn replay(lines: &[&str], config: &MotionConfig) -> Vec<(f64, f64)> {
    let mut scaler = MotionScaler::new(config);
    let mut out = Vec::new();
    for line in lines {
        match parse_command(line) {
            Ok(Command::MoveDelta { dx, dy }) => out.extend(scaler.apply(dx, dy)),
            Ok(Command::SetScale(s)) => scaler.set_scale(s),
            Ok(_) | Err(_) => {}
        }
    }
    out
}

#[test]
fn test_set_scale_then_move_delta_yields_scaled_motion() {
    let motion = replay(&["SET_SCALE:2.0", "MOVE_DELTA:1,1"], &MotionConfig::default());
    assert_eq!(motion, vec![(2.0, 2.0)]);
}

#[test]
fn test_set_scale_then_move_delta_with_single_entry_smoothing() {
    let config = MotionConfig {
        smoothing: true,
        history_len: 1,
        ..MotionConfig::default()
    };
    let motion = replay(&["SET_SCALE:2.0", "MOVE_DELTA:1,1"], &config);
    assert_eq!(motion, vec![(2.0, 2.0)]);
}

#[test]
fn test_malformed_command_does_not_block_later_commands() {
    let motion = replay(
        &["SET_SCALE:1", "MOVE_DELTA:abc,def", "MOVE_DELTA:3,4"],
        &MotionConfig::default(),
    );
    assert_eq!(motion, vec![(3.0, 4.0)]);
}

#[test]
fn test_unparsable_scale_keeps_previous_factor() {
    let motion = replay(
        &["SET_SCALE:3", "SET_SCALE:zero", "SET_SCALE:inf", "MOVE_DELTA:1,0"],
        &MotionConfig::default(),
    );
    assert_eq!(motion, vec![(3.0, 0.0)]);
}

#[test]
fn test_negative_scale_inverts_motion() {
    let motion = replay(&["SET_SCALE:-1", "MOVE_DELTA:2,3"], &MotionConfig::default());
    assert_eq!(motion, vec![(-2.0, -3.0)]);
}

#[test]
fn test_zero_scale_freezes_pointer() {
    let motion = replay(&["SET_SCALE:0", "MOVE_DELTA:50,-50"], &MotionConfig::default());
    assert!(motion.is_empty());
}

#[test]
fn test_dead_zone_is_applied_after_scaling() {
    // 0.3 raw is below threshold at scale 1 but above it at scale 2.
    let motion = replay(
        &["SET_SCALE:1", "MOVE_DELTA:0.3,0.3", "SET_SCALE:2", "MOVE_DELTA:0.3,0.3"],
        &MotionConfig::default(),
    );
    assert_eq!(motion.len(), 1);
    assert!((motion[0].0 - 0.6).abs() < 1e-9);
}

#[test]
fn test_scroll_verbs_carry_opposite_signs() {
    let up = parse_command("SCROLL_UP").unwrap();
    let down = parse_command("SCROLL_DOWN").unwrap();
    assert_eq!(up, Command::Scroll(ScrollDirection::Up));
    assert_eq!(down, Command::Scroll(ScrollDirection::Down));
    assert_eq!(ScrollDirection::Up.sign(), -ScrollDirection::Down.sign());
}

#[test]
fn test_hotkey_names_resolve_through_keymap() {
    let Command::Hotkey(combo) = parse_command("HOTKEY_CTRL_SHIFT_ESC").unwrap() else {
        panic!("expected hotkey");
    };
    let keys: Vec<Option<KeyName>> = combo
        .keys()
        .iter()
        .map(|k| KeyName::from_token(k))
        .collect();
    assert_eq!(
        keys,
        vec![Some(KeyName::Ctrl), Some(KeyName::Shift), Some(KeyName::Escape)]
    );
}

#[test]
fn test_hotkey_with_unknown_name_still_parses() {
    // Unknown names are an injection-time failure, not a parse failure.
    let Command::Hotkey(combo) = parse_command("HOTKEY_HYPER_X").unwrap() else {
        panic!("expected hotkey");
    };
    assert_eq!(KeyName::from_token(&combo.keys()[0]), None);
}

#[test]
fn test_empty_hotkey_is_parse_error() {
    assert!(matches!(
        parse_command("HOTKEY_"),
        Err(ParseError::EmptyHotkey(_))
    ));
}
