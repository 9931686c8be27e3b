use std::io::{self, Write};

use crate::sim::Sample;

/// Write a sampled run in CSV format.
///
/// Columns: time, setpoint, measured, output, error
pub fn write_samples<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "time,setpoint,measured,output,error")?;

    for s in samples {
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6}",
            s.time,
            s.setpoint,
            s.measured,
            s.output,
            s.error(),
        )?;
    }

    Ok(())
}

/// Write a sampled run to a CSV file at the given path.
pub fn write_samples_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_samples(&mut file, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_rows() {
        let samples = vec![
            Sample { time: 0.0, setpoint: 1.0, measured: 0.0, output: 2.0 },
            Sample { time: 0.1, setpoint: 1.0, measured: 0.25, output: 1.5 },
        ];

        let mut buf = Vec::new();
        write_samples(&mut buf, &samples).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "time,setpoint,measured,output,error");
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert_eq!(lines[2], "0.1000,1.000000,0.250000,1.500000,0.750000");
    }
}
