use crate::error::ErrorDetail;
use std::fs;
use std::path::Path;

/// An abstraction of a CHIP-8 ROM, ready for loading into the Ocho emulator.
#[derive(Debug)]
pub struct Program {
    /// A byte vector containing the program data as loaded from the ROM.
    program_data: Vec<u8>,
}

impl Default for Program {
    /// Constructor that returns an empty [Program] instance.
    fn default() -> Self {
        Program {
            program_data: Vec::new(),
        }
    }
}

impl Program {
    /// Constructor that returns a [Program] instance representing the passed program data.
    pub fn new(data: Vec<u8>) -> Self {
        Program { program_data: data }
    }

    /// Constructor that returns a [Program] instance holding the raw byte image read from
    /// the specified file.  Returns [ErrorDetail::FileError] if the file cannot be read.
    ///
    /// CHIP-8 ROMs carry no header or checksum; the file contents are the program bytes.
    ///
    /// # Arguments
    ///
    /// * `file_path` - the path of the ROM file to read
    pub fn load_from_file(file_path: &Path) -> Result<Self, ErrorDetail> {
        match fs::read(file_path) {
            Ok(data) => Ok(Program { program_data: data }),
            Err(_) => Err(ErrorDetail::FileError {
                file_path: file_path.display().to_string(),
            }),
        }
    }

    /// Returns a reference to the program data held in this instance.
    pub fn program_data(&self) -> &Vec<u8> {
        &self.program_data
    }

    /// Returns the size of the instance's program data (in bytes).
    pub(crate) fn program_data_size(&self) -> usize {
        self.program_data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_program() -> Vec<u8> {
        vec![0xA1, 0x14, 0x0C, 0xFD, 0xA3]
    }

    #[test]
    fn test_program_data() {
        let test_program: Vec<u8> = setup_test_program();
        let program: Program = Program::new(test_program.clone());
        assert_eq!(program.program_data(), &test_program);
    }

    #[test]
    fn test_program_data_size() {
        let test_program: Vec<u8> = setup_test_program();
        let program: Program = Program::new(test_program.clone());
        assert_eq!(program.program_data_size(), test_program.len());
    }

    #[test]
    fn test_load_from_file_missing_error() {
        let path = Path::new("this/rom/does/not/exist.ch8");
        assert_eq!(
            Program::load_from_file(path).unwrap_err(),
            ErrorDetail::FileError {
                file_path: path.display().to_string()
            }
        );
    }
}
