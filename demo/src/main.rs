use gitstamp::BuildIdentity;
use std::io::{self, Write};

gitstamp::include_build_identity!();

fn run(identity: &BuildIdentity<'_>, out: &mut impl Write) -> io::Result<()> {
    write!(out, "{identity}")
}

fn main() {
    // Printing can only fail on a closed stdout; there is nothing to report then.
    let _ = run(&BUILD_IDENTITY, &mut io::stdout().lock());
}
