//! Two participants editing one list across several message round trips.
//!
//! # Design
//! Stands in for the host: each participant keeps the list they last saw,
//! edits it, reconciles, encodes, and "sends" the link. Delivery is
//! simulated by handing links over in whatever order the test chooses, since
//! real message delivery is not FIFO.

use thyme_core::{Link, ListCodec, ListMerger, ToDoList};

const FALLBACK_TITLE: &str = "Thyme";

struct Participant {
    id: &'static str,
    codec: ListCodec,
    list: ToDoList,
}

impl Participant {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            codec: ListCodec::default(),
            // Creator is unknown until the first send or receive.
            list: ToDoList::new(""),
        }
    }

    /// Apply a local edit and produce the outgoing link.
    fn edit(&mut self, f: impl FnOnce(&ToDoList) -> ToDoList) -> Link {
        let edited = f(&self.list).prepare_for_send(FALLBACK_TITLE, self.id);
        self.list = ListMerger::reconcile(&self.list, &edited).unwrap();
        self.codec.encode(&self.list).unwrap()
    }

    fn receive(&mut self, link: &Link) {
        let remote = self.codec.decode(link).unwrap();
        self.list = ListMerger::reconcile(&self.list, &remote).unwrap();
    }

    fn item_id(&self, name: &str) -> String {
        self.list
            .items
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.id.clone())
            .unwrap()
    }

    fn names(&self) -> Vec<&str> {
        self.list.visible_items().map(|item| item.name.as_str()).collect()
    }
}

#[test]
fn first_send_fills_title_and_creator() {
    let mut alice = Participant::new("alice");
    let link = alice.edit(|l| l.add_item("Milk").0);

    let mut bob = Participant::new("bob");
    bob.receive(&link);
    assert_eq!(bob.list.name, FALLBACK_TITLE);
    assert_eq!(bob.list.created_by, "alice");
    assert_eq!(bob.names(), vec!["Milk"]);
}

#[test]
fn concurrent_edits_converge_regardless_of_delivery_order() {
    let mut alice = Participant::new("alice");
    let first = alice.edit(|l| {
        let (l, _) = l.rename("Camping").add_item("Tent");
        let (l, _) = l.add_item("Stove");
        l.add_item("Matches").0
    });

    let mut bob = Participant::new("bob");
    bob.receive(&first);

    // Both edit without seeing each other's change.
    let tent = alice.item_id("Tent");
    let from_alice = alice.edit(|l| {
        let (l, _) = l.add_item("Lantern");
        l.set_checked(&tent, true, "alice", 1_000).unwrap()
    });
    let stove = bob.item_id("Stove");
    let from_bob = bob.edit(|l| {
        let (l, _) = l.add_item("Map");
        l.set_checked(&stove, true, "bob", 900).unwrap()
    });

    alice.receive(&from_bob);
    bob.receive(&from_alice);

    assert_eq!(alice.list.items.len(), 5);
    let state = |list: &ToDoList| {
        let mut s: Vec<_> = list
            .items
            .iter()
            .map(|i| (i.id.clone(), i.checked, i.checked_at))
            .collect();
        s.sort();
        s
    };
    assert_eq!(state(&alice.list), state(&bob.list));

    // Checked items sit at the bottom in check order on both sides.
    assert_eq!(&alice.names()[3..], &["Stove", "Tent"]);
    assert_eq!(&bob.names()[3..], &["Stove", "Tent"]);
}

#[test]
fn stale_message_does_not_undo_newer_state() {
    let mut alice = Participant::new("alice");
    let created = alice.edit(|l| l.add_item("Milk").0);
    let milk = alice.item_id("Milk");

    let checked = alice.edit(|l| l.set_checked(&milk, true, "alice", 2_000).unwrap());

    let mut bob = Participant::new("bob");
    bob.receive(&checked);
    // The older message shows up late.
    bob.receive(&created);

    let item = bob.list.item(&milk).unwrap();
    assert!(item.checked);
    assert_eq!(item.checked_at, 2_000);
}

#[test]
fn uncheck_after_remote_check_wins_even_with_slow_clock() {
    let mut alice = Participant::new("alice");
    let created = alice.edit(|l| l.add_item("Milk").0);
    let milk = alice.item_id("Milk");

    let mut bob = Participant::new("bob");
    bob.receive(&created);

    let checked = alice.edit(|l| l.set_checked(&milk, true, "alice", 50_000).unwrap());
    bob.receive(&checked);

    // Bob's clock is far behind, but Bob has seen Alice's check.
    let unchecked = bob.edit(|l| l.set_checked(&milk, false, "bob", 10).unwrap());
    alice.receive(&unchecked);

    let item = alice.list.item(&milk).unwrap();
    assert!(!item.checked);
    assert_eq!(item.checked_by, "bob");
    assert_eq!(item.checked_at, 50_001);
}

#[test]
fn deleted_item_stays_deleted_after_older_copy_arrives() {
    let mut alice = Participant::new("alice");
    let created = alice.edit(|l| {
        let (l, _) = l.add_item("Milk");
        l.add_item("Eggs").0
    });
    let eggs = alice.item_id("Eggs");

    let mut bob = Participant::new("bob");
    bob.receive(&created);
    let deleted = bob.edit(|l| l.delete_item(&eggs, 3_000).unwrap());

    alice.receive(&deleted);
    alice.receive(&created);

    assert_eq!(alice.names(), vec!["Milk"]);
    assert_eq!(alice.list.items.len(), 2);
}
