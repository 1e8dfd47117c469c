/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result` or logs the error and exits the process.
/// Used for setup failures that leave nothing worth continuing with.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    };
}
