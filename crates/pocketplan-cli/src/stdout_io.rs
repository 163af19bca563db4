use std::io::{self, Write};

/// Writes help or rendered output as-is. A closed pipe (`pocketplan trend | head`)
/// is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    emit(&mut io::stdout().lock(), text, true)
}

fn emit<W: Write>(writer: &mut W, text: &str, newline: bool) -> io::Result<()> {
    let written = writer.write_all(text.as_bytes()).and_then(|()| {
        if newline {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    });
    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
