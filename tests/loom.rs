#![cfg(loom)]

use {
    loom::{sync::Arc, thread},
    rw_bench::{
        task::{self, Ones, SumConsistency},
        ReaderAccess, SharedBuffer, Work,
    },
};

const SLOTS: usize = 2;

fn shared_buffer() -> Arc<SharedBuffer> {
    let mut buffer = SharedBuffer::new("shared");
    buffer.initialize(SLOTS);
    Arc::new(buffer)
}

#[test]
fn a_reader_never_sees_a_partial_write() {
    loom::model(|| {
        let buffer = shared_buffer();

        let writer = thread::spawn({
            let buffer = Arc::clone(&buffer);
            move || task::write(&buffer, &Work::none(), &Ones).unwrap()
        });

        let sum = task::read(&buffer, ReaderAccess::Shared, &Work::none(), &SumConsistency)
            .unwrap();
        assert!(sum == 0 || sum == SLOTS as i64);

        writer.join().unwrap();

        assert_eq!(buffer.shared().unwrap().iter().sum::<i64>(), SLOTS as i64);
        assert_eq!(buffer.occupancy().overlaps, 0);
    });
}

#[test]
fn readers_share_the_lock_but_exclude_the_writer() {
    loom::model(|| {
        let buffer = shared_buffer();

        let readers = (0..2)
            .map(|_| {
                thread::spawn({
                    let buffer = Arc::clone(&buffer);
                    move || {
                        task::read(&buffer, ReaderAccess::Shared, &Work::none(), &SumConsistency)
                            .unwrap()
                    }
                })
            })
            .collect::<Vec<_>>();

        task::write(&buffer, &Work::none(), &Ones).unwrap();

        for reader in readers {
            let sum = reader.join().unwrap();
            assert!(sum == 0 || sum == SLOTS as i64);
        }

        let occupancy = buffer.occupancy();
        assert!(occupancy.peak_readers <= 2);
        assert_eq!(occupancy.overlaps, 0);
    });
}
