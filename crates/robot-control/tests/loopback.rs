use robot_control::{Dispatcher, MetricsHub, MockHardware, SessionController, SessionEnd};
use robot_protocol::{CommandLink, TcpLink, TransportError};
use std::net::TcpListener;
use std::thread;

fn spawn_robot(hw: MockHardware) -> anyhow::Result<(String, thread::JoinHandle<SessionEnd>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?.to_string();
    let handle = thread::spawn(move || {
        let dispatcher = Dispatcher::new(Box::new(hw)).with_time_scale(0.0);
        let mut ctl = SessionController::new(dispatcher, MetricsHub::new().unwrap());
        ctl.accept_one(&listener).unwrap()
    });
    Ok((addr, handle))
}

#[test]
fn full_session_over_tcp() -> anyhow::Result<()> {
    let hw = MockHardware::new();
    hw.set_distance(17.6);
    let (addr, robot) = spawn_robot(hw)?;
    let mut link = TcpLink::connect(&addr)?;

    assert_eq!(link.exchange("history")?, "No commands yet.");
    assert_eq!(link.exchange("forward")?, "Moved forward");
    assert_eq!(link.exchange("left")?, "Turned left");
    assert_eq!(link.exchange("distance")?, "Distance is 17 centimeters");
    assert_eq!(link.exchange("dance")?, "");
    assert_eq!(link.exchange("history")?, "history\nforward\nleft\ndistance\ndance");
    assert_eq!(link.exchange("exit")?, "exit");

    let end = robot.join().expect("robot thread");
    assert!(matches!(end, SessionEnd::Exit));

    // Robot is gone; the next exchange must fail instead of hanging
    let err = link.exchange("forward").unwrap_err();
    assert!(matches!(err, TransportError::Closed | TransportError::Io(_)));
    Ok(())
}

#[test]
fn operator_disconnect_ends_session() -> anyhow::Result<()> {
    let (addr, robot) = spawn_robot(MockHardware::new())?;
    let mut link = TcpLink::connect(&addr)?;
    assert_eq!(link.exchange("stop")?, "All motors stopped");
    link.close();
    assert!(!link.is_open());
    assert!(matches!(link.exchange("stop"), Err(TransportError::Closed)));

    let end = robot.join().expect("robot thread");
    assert!(matches!(end, SessionEnd::PeerClosed));
    Ok(())
}
