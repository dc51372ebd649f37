use std::fmt::{Display, Formatter, Write as _};
use std::fs;
use std::path::Path;
use crate::error::Result;
use crate::export::QuantizedPsqt;
use crate::features::NUM_SQUARES;
use crate::utils::ColoredPiece;

impl QuantizedPsqt {
    fn table_literal(&self) -> String {
        let mut res = String::from("[\n");
        for row in self.table.iter() {
            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(res, "    [{}],", values.join(", "));
        }
        res += "]";
        res
    }

    /// Constant declarations the engine includes verbatim. Identical input always renders
    /// to identical bytes.
    pub fn to_rust_source(&self) -> String {
        let mut res = String::new();
        let _ = writeln!(
            res,
            "pub const PSQT: [[i32; {}]; {}] = {};",
            NUM_SQUARES,
            ColoredPiece::LIMIT,
            self.table_literal()
        );
        let _ = writeln!(res, "pub const TEMPO_BONUS: i32 = {};", self.tempo_bonus);
        let _ = writeln!(res, "pub const BIAS: i32 = {};", self.bias);
        let _ = writeln!(res, "pub const DIV: i32 = {};", self.divisor);
        res
    }

    /// Renders the whole file before touching the disk, so a failure leaves no partial output.
    pub fn write_rust_source<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let source = self.to_rust_source();
        fs::write(path, source)?;
        Ok(())
    }
}

impl Display for QuantizedPsqt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rust_source())
    }
}
