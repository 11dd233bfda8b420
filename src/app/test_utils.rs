use std::io::Write;
use std::sync::{Arc, Mutex};

use super::printer::EventPrinter;

/// In-memory output shared between a printer and the test reading it back.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub(crate) fn buffered_printer() -> (EventPrinter, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let printer = EventPrinter::new(Box::new(out.clone()), Box::new(err.clone()));
    (printer, out, err)
}
