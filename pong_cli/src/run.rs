use anyhow::{Context, Result};
use game_core::{
    AudioAdapter, Config, KeyBindings, KeyboardState, LocalGame, PaddleCommand, RenderAdapter,
    Side,
};
use netplay::loopback::{direct_pair, DirectFault, HubLink, LoopbackDirect, RelayHub};
use netplay::{NetConfig, NetSession, SessionState};

use crate::adapters::{LogAudio, LogRenderer};
use crate::autopilot;

pub const DT: f32 = 1.0 / 60.0;

pub fn single(config: Config, seed: u64, ticks: u32) -> Result<()> {
    let mut renderer = LogRenderer::new(config.court_half_length, 30);
    let mut audio = LogAudio::default();
    let mut game = LocalGame::with_config(config, KeyBindings::default(), seed)?;
    let mut keys = KeyboardState::new();

    let mut frame = game.game.frame();
    for _ in 0..ticks {
        autopilot::press(&mut keys, autopilot::track(&frame, Side::Near));
        frame = game.tick(&keys, DT);
        for event in game.events() {
            audio.play(event);
        }
        renderer.draw(&frame);
    }

    println!(
        "Single-player: {}-{} after {} hits and {} wall bounces",
        frame.score.near, frame.score.far, audio.hits, audio.bounces
    );
    Ok(())
}

type Session = NetSession<HubLink, LoopbackDirect>;

struct Participant {
    session: Session,
    link: HubLink,
    side: Side,
}

impl Participant {
    fn tick(&mut self) {
        for bytes in self.link.take_inbound() {
            self.session.receive_signal_bytes(&bytes);
        }
        let command = if self.session.state() == SessionState::Active {
            autopilot::track(&self.session.frame(), self.side)
        } else {
            PaddleCommand::default()
        };
        self.session.tick(DT, command);
    }
}

fn round(host: &mut Participant, guest: &mut Participant) {
    host.tick();
    guest.tick();
}

pub fn loopback(
    config: Config,
    seed: u64,
    ticks: u32,
    fault: DirectFault,
    break_at_tick: Option<u32>,
) -> Result<()> {
    let net_config = NetConfig {
        game: config,
        seed,
        ..NetConfig::default()
    };
    let hub = RelayHub::new(seed);
    let (host_direct, guest_direct, control) = direct_pair(fault);

    let host_link = hub.connect();
    let guest_link = hub.connect();
    let mut host = Participant {
        session: NetSession::new(host_link.clone(), host_direct, net_config.clone())?,
        link: host_link,
        side: Side::Near,
    };
    let mut guest = Participant {
        session: NetSession::new(guest_link.clone(), guest_direct, net_config)?,
        link: guest_link,
        side: Side::Far,
    };

    host.session.create_room()?;
    round(&mut host, &mut guest);
    let code = host
        .session
        .room_code()
        .context("relay did not assign a room code")?
        .to_string();
    println!("Room {code}");

    guest.session.join_room(&code)?;
    round(&mut host, &mut guest);
    host.session.ready()?;
    guest.session.ready()?;
    round(&mut host, &mut guest);

    let mut renderer = LogRenderer::new(host.session.game().config.court_half_length, 30);
    let mut audio = LogAudio::default();
    let mut status = host.session.status();
    for tick in 0..ticks {
        if break_at_tick == Some(tick) {
            log::info!("Breaking the direct channel at tick {tick}");
            control.break_link();
        }
        round(&mut host, &mut guest);

        for event in host.session.game().events() {
            audio.play(event);
        }
        renderer.draw(&host.session.frame());

        if host.session.status() != status {
            status = host.session.status();
            log::info!("Transport: {}", status.label());
        }
        if host.session.state() == SessionState::Ended
            && guest.session.state() == SessionState::Ended
        {
            break;
        }
    }

    let score = host.session.score();
    println!("Score {}-{}", score.near, score.far);
    for (name, participant) in [("Host", &host), ("Guest", &guest)] {
        let session = &participant.session;
        println!(
            "{name}: {:?}, {}",
            session.state(),
            session
                .outcome_message()
                .unwrap_or_else(|| "match still running".to_string())
        );
    }
    println!(
        "Direct messages {}, relayed messages {}",
        control.delivered(),
        hub.relayed_game_messages()
    );
    Ok(())
}
