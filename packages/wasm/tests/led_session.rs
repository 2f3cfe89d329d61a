use otb_wasm::led::{
    patterns_for, Arrangement, Command, FramePattern, LedSession, PatternKind, Rgb,
    SessionConfig,
};

#[test]
fn pattern_frames_round_trip_through_protocol() {
    let config = SessionConfig {
        led_count: 16,
        brightness: 255,
        arrangement: Arrangement::Matrix,
        ..SessionConfig::default()
    };
    let mut session = LedSession::new(config);
    session.connect(Vec::<String>::new()).unwrap();

    let kind = patterns_for(Arrangement::Matrix)[0];
    session.run_pattern(kind, 0);
    let interval = kind.frame_interval_ms() as u64;
    for n in 1..=5 {
        assert!(session.tick(n * interval).unwrap());
    }

    let lines = session.sink_mut().unwrap().clone();
    assert_eq!(lines.len(), 2 + 5);
    assert_eq!(Command::parse(&lines[0]), Ok(Command::LedCount(16)));
    assert_eq!(Command::parse(&lines[1]), Ok(Command::Brightness(255)));

    for (frame, line) in lines[2..].iter().enumerate() {
        assert!(line.ends_with("\r\n"));
        let expected = kind.colors_for_frame(frame as u64, 16);
        assert_eq!(Command::parse(line), Ok(Command::Frame(expected)));
    }
}

#[test]
fn every_frame_covers_every_led() {
    let mut session = LedSession::new(SessionConfig::default());
    session.connect(Vec::<String>::new()).unwrap();
    session.set_layout(30, Arrangement::Strip).unwrap();
    session.run_pattern(PatternKind::RainbowWave, 0);
    session.tick(100).unwrap();

    let last = session.sink_mut().unwrap().last().cloned().unwrap();
    match Command::parse(&last).unwrap() {
        Command::Frame(colors) => {
            assert_eq!(colors.len(), 30);
            // Red at full hue, halved by the default brightness
            assert_eq!(colors[0], Rgb::new(128, 0, 0));
        }
        other => panic!("expected a frame, got {:?}", other),
    }
}
