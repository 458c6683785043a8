/// Read / write `f32` arrays as headerless little-endian binary

use std::fs::File;
use std::io::{Write, Read, BufWriter, BufReader, Error, ErrorKind};
use std::path::Path;

const BYTES: u64 = std::mem::size_of::<f32>() as u64;

pub fn write(data: impl Iterator<Item = f32>, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut buf = BufWriter::new(file);
    for datum in data {
        buf.write_all(&datum.to_le_bytes())?;
    }
    buf.flush()
}

type IORes<T> = std::io::Result<T>;

/// Values in `path`, which must hold a whole number of `f32`s
pub fn read<'a>(path: &Path) -> IORes<impl Iterator<Item = IORes<f32>> + 'a> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    if size % BYTES != 0 {
        return Err(Error::new(ErrorKind::InvalidData,
                              format!("{} is {size} bytes long: not a whole number of f32s", path.display())));
    }
    let mut buf = BufReader::new(file);
    let mut buffer = [0; BYTES as usize];

    Ok(std::iter::from_fn(move || {
        match buf.read_exact(&mut buffer) {
            Ok(()) => Some(Ok(f32::from_le_bytes(buffer))),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => None,
            Err(e) => Some(Err(e)),
        }
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn raw_io_roundtrip() -> std::io::Result<()> {
        // Harmless temporary location for output file
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("test.raw");

        let original_data = vec![1.23, -4.56, 7.89e-12, f32::MAX];
        write(original_data.iter().copied(), &file_path)?;

        let reloaded_data: Vec<_> = read(&file_path)?
            .collect::<Result<_, _>>()?;
        assert_eq!(original_data, reloaded_data);
        Ok(())
    }

    #[test]
    fn partial_value_is_rejected() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("truncated.raw");
        std::fs::write(&file_path, [0_u8; 7])?;
        let err = read(&file_path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        Ok(())
    }
}
