use flight_grid::{Cell, FlightError, FlightResult};
use std::path::Path;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, E, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, E>,
) -> FlightResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(FlightError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part).map_err(|_| FlightError::InvalidArgument {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse cell string "X,Z"
pub fn parse_cell(cell_str: &str) -> FlightResult<Cell> {
    let [x, z] = parse_delimited::<i32, _, 2>(cell_str, ',', "cell", |s| s.parse())?;
    Ok(Cell::new(x, z))
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> FlightResult<(u32, u32)> {
    let [width, height] = parse_delimited::<u32, _, 2>(size_str, 'x', "size", |s| s.parse())?;

    if width == 0 || height == 0 {
        return Err(FlightError::InvalidArgument {
            reason: "Width and height must be greater than 0".to_string(),
        });
    }

    if width > 2048 || height > 2048 {
        return Err(FlightError::InvalidArgument {
            reason: "Width and height must not exceed 2048".to_string(),
        });
    }

    Ok((width, height))
}

/// Output files are written under the maps directory only
pub fn validate_output_path(filename: &str) -> FlightResult<()> {
    if Path::new(filename).is_absolute() {
        return Err(FlightError::InvalidArgument {
            reason: format!(
                "Output path must be relative to the maps/ directory, got absolute path: {filename}"
            ),
        });
    }

    if filename.contains("..") {
        return Err(FlightError::InvalidArgument {
            reason: "Output path cannot contain '..'".to_string(),
        });
    }

    Ok(())
}
