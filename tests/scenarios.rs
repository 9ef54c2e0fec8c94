//! End-to-end scenarios driving a machine through realistic tick sequences.

use hfsm::core::condition::{never, not};
use hfsm::debug::DebugView;
use hfsm::{ConfigurationError, Hooks, Machine, StateKey, StateKind};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn flag() -> Rc<Cell<bool>> {
    Rc::new(Cell::new(false))
}

fn reads(flag: &Rc<Cell<bool>>) -> impl Fn() -> bool + 'static {
    let flag = flag.clone();
    move || flag.get()
}

fn logged(log: &Log, name: &str) -> Hooks {
    let (enter, tick, exit) = (log.clone(), log.clone(), log.clone());
    let name = name.to_string();
    let (a, b, c) = (name.clone(), name.clone(), name);
    Hooks::new()
        .on_enter(move || enter.borrow_mut().push(format!("enter {a}")))
        .on_tick(move || tick.borrow_mut().push(format!("tick {b}")))
        .on_exit(move || exit.borrow_mut().push(format!("exit {c}")))
}

fn current(machine: &Machine) -> String {
    machine.current_key().map(ToString::to_string).unwrap_or_default()
}

#[test]
fn locomotion() {
    let move_requested = flag();
    let jump_requested = flag();

    let mut machine = Machine::new();
    let mut states = machine.states();
    states.add_simple("Idle", Hooks::new(), true).unwrap();
    states.add_simple("Walking", Hooks::new(), false).unwrap();
    states.add_simple("Jumping", Hooks::new(), false).unwrap();

    let mut t = states.transitions();
    t.from_simple("Idle")
        .unwrap()
        .to_simple("Walking")
        .unwrap()
        .set(reads(&move_requested))
        .unwrap();
    t.from_simple("Walking")
        .unwrap()
        .to_simple("Idle")
        .unwrap()
        .set(not(reads(&move_requested)))
        .unwrap();
    t.from_simple("Walking")
        .unwrap()
        .to_simple("Jumping")
        .unwrap()
        .set(reads(&jump_requested))
        .unwrap();
    t.from_simple("Jumping").unwrap().to_simple("Idle").unwrap().set(never()).unwrap();

    machine.initialize().unwrap();
    assert_eq!(current(&machine), "Idle");

    move_requested.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Walking");

    jump_requested.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Jumping");

    assert!(!machine.update().unwrap());
    assert_eq!(current(&machine), "Jumping");
}

fn combat_machine(log: &Log, in_combat: &Rc<Cell<bool>>, blocking: &Rc<Cell<bool>>) -> Machine {
    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_simple("Idle", logged(log, "Idle"), true).unwrap();
    root.add_hierarchical_with("Combat", logged(log, "Combat"), false).unwrap();

    {
        let mut combat = root.nested("Combat").unwrap();
        combat.add_simple("Attack", logged(log, "Attack"), true).unwrap();
        combat.add_simple("Block", logged(log, "Block"), false).unwrap();
        let mut t = combat.transitions();
        t.from_simple("Attack").unwrap().to_simple("Block").unwrap().set(reads(blocking)).unwrap();
        t.from_simple("Block")
            .unwrap()
            .to_simple("Attack")
            .unwrap()
            .set(not(reads(blocking)))
            .unwrap();
    }

    let mut t = root.transitions();
    t.from_simple("Idle")
        .unwrap()
        .to_hierarchical("Combat")
        .unwrap()
        .set(reads(in_combat))
        .unwrap();
    t.from_hierarchical("Combat")
        .unwrap()
        .to_simple("Idle")
        .unwrap()
        .set(not(reads(in_combat)))
        .unwrap();
    machine
}

#[test]
fn entering_combat_starts_attack() {
    let log: Log = Rc::default();
    let (in_combat, blocking) = (flag(), flag());
    let mut machine = combat_machine(&log, &in_combat, &blocking);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    machine.subscribe(move |change| sink.borrow_mut().push(change.current.key.clone()));
    machine.initialize().unwrap();

    assert!(!machine.update().unwrap());
    log.borrow_mut().clear();

    in_combat.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Attack");
    assert_eq!(
        *log.borrow(),
        vec!["exit Idle", "enter Combat", "enter Attack"]
    );

    blocking.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Block");

    // Combat is never reported as the running state.
    assert_eq!(
        *changes.borrow(),
        vec![StateKey::simple("Attack"), StateKey::simple("Block")]
    );
}

#[test]
fn parent_transition_preempts_child() {
    let log: Log = Rc::default();
    let (in_combat, blocking) = (flag(), flag());
    let mut machine = combat_machine(&log, &in_combat, &blocking);
    machine.initialize().unwrap();

    in_combat.set(true);
    machine.update().unwrap();
    assert_eq!(current(&machine), "Attack");

    // Both Combat -> Idle and Attack -> Block hold: the outer edge wins.
    in_combat.set(false);
    blocking.set(true);
    log.borrow_mut().clear();
    assert!(machine.update().unwrap());

    assert_eq!(current(&machine), "Idle");
    assert_eq!(
        *log.borrow(),
        vec!["exit Attack", "exit Combat", "enter Idle"]
    );
}

#[test]
fn child_tick_runs_only_when_nothing_fires() {
    let log: Log = Rc::default();
    let (in_combat, blocking) = (flag(), flag());
    let mut machine = combat_machine(&log, &in_combat, &blocking);
    machine.initialize().unwrap();

    in_combat.set(true);
    machine.update().unwrap();
    log.borrow_mut().clear();

    assert!(!machine.update().unwrap());
    assert_eq!(*log.borrow(), vec!["tick Attack"]);
}

#[test]
fn nested_containers_cascade() {
    let log: Log = Rc::default();
    let leave = flag();

    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_hierarchical_with("Outer", logged(&log, "Outer"), true).unwrap();
    root.add_simple("Done", logged(&log, "Done"), false).unwrap();
    {
        let mut outer = root.nested("Outer").unwrap();
        outer.add_hierarchical_with("Inner", logged(&log, "Inner"), true).unwrap();
        let mut inner = outer.nested("Inner").unwrap();
        inner.add_simple("Leaf", logged(&log, "Leaf"), true).unwrap();
        inner
            .transitions()
            .from_simple("Leaf")
            .unwrap()
            .to_simple("Leaf")
            .unwrap()
            .set(never())
            .unwrap();
        outer
            .transitions()
            .from_hierarchical("Inner")
            .unwrap()
            .to_hierarchical("Inner")
            .unwrap()
            .set(never())
            .unwrap();
    }
    let mut t = root.transitions();
    t.from_hierarchical("Outer").unwrap().to_simple("Done").unwrap().set(reads(&leave)).unwrap();
    t.from_simple("Done").unwrap().to_hierarchical("Outer").unwrap().set(never()).unwrap();

    machine.initialize().unwrap();
    assert_eq!(current(&machine), "Outer");

    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Leaf");
    assert_eq!(
        *log.borrow(),
        vec!["enter Outer", "enter Inner", "enter Leaf", "tick Leaf"]
    );

    log.borrow_mut().clear();
    leave.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Done");
    assert_eq!(
        *log.borrow(),
        vec!["exit Leaf", "exit Inner", "exit Outer", "enter Done"]
    );
}

#[test]
fn from_this_restarts_the_sub_machine() {
    let reset = flag();
    let advance = flag();

    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_hierarchical("Combo", true).unwrap();
    {
        let mut combo = root.nested("Combo").unwrap();
        combo.add_simple("First", Hooks::new(), true).unwrap();
        combo.add_simple("Second", Hooks::new(), false).unwrap();
        let mut t = combo.transitions();
        t.from_simple("First").unwrap().to_simple("Second").unwrap().set(reads(&advance)).unwrap();
        t.from_simple("Second").unwrap().to_simple("First").unwrap().set(never()).unwrap();
        t.from_this().unwrap().to_simple("First").unwrap().set(reads(&reset)).unwrap();
    }

    machine.initialize().unwrap();
    machine.update().unwrap();
    advance.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Second");

    advance.set(false);
    reset.set(true);
    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "First");
}

#[test]
fn initialize_reports_missing_nested_start() {
    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_hierarchical("Combat", true).unwrap();
    root.nested("Combat").unwrap().add_simple("Attack", Hooks::new(), false).unwrap();

    assert_eq!(
        machine.initialize(),
        Err(ConfigurationError::MissingStartState {
            collection: "'Combat'".to_string()
        })
    );
}

#[test]
fn initialize_reports_states_without_transitions() {
    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_simple("Idle", Hooks::new(), true).unwrap();
    root.add_simple("Stuck", Hooks::new(), false).unwrap();
    root.transitions()
        .from_simple("Idle")
        .unwrap()
        .to_simple("Stuck")
        .unwrap()
        .set(never())
        .unwrap();

    assert_eq!(
        machine.initialize(),
        Err(ConfigurationError::NoTransitions {
            state: "Stuck".to_string()
        })
    );
}

#[test]
fn mutations_fail_after_initialize() {
    let mut machine = Machine::new();
    let mut root = machine.states();
    let idle = root.add_simple("Idle", Hooks::new(), true).unwrap();
    root.add_simple("Other", Hooks::new(), false).unwrap();
    let mut t = root.transitions();
    t.from_simple("Idle").unwrap().to_simple("Other").unwrap().set(never()).unwrap();
    t.from_simple("Other").unwrap().to_simple("Idle").unwrap().set(never()).unwrap();
    machine.initialize().unwrap();

    let frozen = |result: Result<(), ConfigurationError>| {
        assert!(matches!(result, Err(ConfigurationError::NotConfiguring { .. })));
    };
    let mut root = machine.states();
    frozen(root.add_simple("Late", Hooks::new(), false).map(|_| ()));
    frozen(root.add_hierarchical("LateBox", false).map(|_| ()));
    frozen(root.set_start_state(idle).map(|_| ()));
    frozen(root.remove_by_key(StateKind::Simple, "Other").map(|_| ()));
    frozen(
        root.transitions()
            .from_simple("Other")
            .unwrap()
            .to_simple("Other")
            .unwrap()
            .set(never())
            .map(|_| ()),
    );
    frozen(
        root.transitions()
            .from_simple("Idle")
            .unwrap()
            .to_simple("Other")
            .unwrap()
            .remove()
            .map(|_| ()),
    );

    // Queries still work.
    assert!(root
        .transitions()
        .from_simple("Idle")
        .unwrap()
        .to_simple("Other")
        .unwrap()
        .exists());
}

#[test]
fn debug_view_follows_a_hierarchical_start_state() {
    let mut machine = Machine::new();
    let mut root = machine.states();
    root.add_hierarchical("Combat", true).unwrap();
    {
        let mut combat = root.nested("Combat").unwrap();
        combat.add_simple("Attack", Hooks::new(), true).unwrap();
        let mut t = combat.transitions();
        t.from_simple("Attack").unwrap().to_simple("Attack").unwrap().set(never()).unwrap();
    }
    let mut t = root.transitions();
    t.from_hierarchical("Combat")
        .unwrap()
        .to_hierarchical("Combat")
        .unwrap()
        .set(never())
        .unwrap();

    machine.initialize().unwrap();
    let view = DebugView::attach(&mut machine);
    assert_eq!(view.current(), "Combat");

    assert!(machine.update().unwrap());
    assert_eq!(current(&machine), "Attack");
    assert_eq!(view.current(), "Attack");
    assert_eq!(view.transition(), "Combat => Attack");
    assert_eq!(view.history().len(), 1);

    assert!(!machine.update().unwrap());
    assert_eq!(view.history().len(), 1);
}
