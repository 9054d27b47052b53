use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;
use std::sync::{Arc, Mutex};

struct DummyWorld;

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Push {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
    }
}

struct PushThenScheduleNow {
    id: u32,
    next_id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for PushThenScheduleNow {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let PushThenScheduleNow { id, next_id, log } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(sim.now(), Push { id: next_id, log });
    }
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(10),
        Push {
            id: 1,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(5),
        Push {
            id: 2,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(10),
        Push {
            id: 3,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(*log.lock().expect("log lock"), vec![2, 1, 3]);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn event_scheduled_at_now_runs_after_current_event() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(5),
        PushThenScheduleNow {
            id: 1,
            next_id: 3,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(5),
        Push {
            id: 2,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(*log.lock().expect("log lock"), vec![1, 2, 3]);
}

#[test]
fn schedule_in_offsets_from_current_time() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule_in(
        SimTime(7),
        Push {
            id: 1,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(sim.now(), SimTime(7));
}

#[test]
fn run_until_executes_boundary_and_advances_clock() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    for (id, at) in [(1, 10), (2, 20), (3, 30)] {
        sim.schedule(
            SimTime(at),
            Push {
                id,
                log: Arc::clone(&log),
            },
        );
    }

    let mut world = DummyWorld;
    sim.run_until(SimTime(20), &mut world);

    // 时刻 20 的事件被执行，30 的留在队列里；时钟推进到 20
    assert_eq!(*log.lock().expect("log lock"), vec![1, 2]);
    assert_eq!(sim.now(), SimTime(20));

    sim.run_until(SimTime(40), &mut world);
    assert_eq!(*log.lock().expect("log lock"), vec![1, 2, 3]);
    assert_eq!(sim.now(), SimTime(40));
}

#[test]
fn run_until_on_empty_queue_still_advances_clock() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    sim.run_until(SimTime::from_secs(10), &mut world);
    assert_eq!(sim.now(), SimTime::from_secs(10));
}
