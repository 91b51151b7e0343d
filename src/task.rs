use crate::{config::ReaderAccess, work::Work, Error, Result, SharedBuffer};

/// Produces the value a writer stores into each slot.
pub trait WorkProducer {
    /// The value for the slot at `index`.
    fn produce(&self, index: usize) -> i64;
}

/// Validates the sum a reader took of the buffer.
pub trait WorkConsumer {
    /// Accept or reject the `sum` of a buffer with `len` slots.
    fn consume(&self, sum: i64, len: usize) -> Result<()>;
}

/// Marks every slot with a one, so a fully written buffer sums to its length.
#[derive(Debug, Default, Copy, Clone)]
pub struct Ones;

/// Accepts a buffer that is either untouched or fully written, nothing in between.
#[derive(Debug, Default, Copy, Clone)]
pub struct SumConsistency;

impl WorkProducer for Ones {
    fn produce(&self, _index: usize) -> i64 {
        1
    }
}

impl WorkConsumer for SumConsistency {
    fn consume(&self, sum: i64, len: usize) -> Result<()> {
        if sum == 0 || sum == len as i64 {
            Ok(())
        } else {
            Err(Error::InvariantViolation { sum, len })
        }
    }
}

/// Fill every slot, in order, while holding exclusive access.
pub fn write(buffer: &SharedBuffer, work: &Work, producer: &impl WorkProducer) -> Result<()> {
    let mut slots = buffer.exclusive()?;

    for (index, slot) in slots.iter_mut().enumerate() {
        work.perform();
        *slot = producer.produce(index);
    }

    Ok(())
}

/// Sum the buffer under the given access mode, then validate the snapshot.
///
/// Returns the observed sum.
pub fn read(
    buffer: &SharedBuffer,
    access: ReaderAccess,
    work: &Work,
    consumer: &impl WorkConsumer,
) -> Result<i64> {
    let (sum, len) = match access {
        ReaderAccess::Shared => {
            let slots = buffer.shared()?;
            (slots.iter().sum::<i64>(), slots.len())
        }
        ReaderAccess::Exclusive => {
            let slots = buffer.exclusive()?;
            (slots.iter().sum::<i64>(), slots.len())
        }
    };

    work.perform();
    consumer.consume(sum, len)?;

    Ok(sum)
}
