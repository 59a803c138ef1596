// Inspects this crate's working tree and generates `$OUT_DIR/gitstamp.rs`.
// Returning the error aborts the build when the tree cannot be inspected.
fn main() -> Result<(), gitstamp::Error> {
    gitstamp::build::Builder::new().emit()?;
    Ok(())
}
