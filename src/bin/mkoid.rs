//! Generates object identifier constants.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation,
//! optionally prefixed with a constant name and an equals sign, and you
//! will receive the definition of a `ConstOid` for each of them:
//!
//! ```text
//! $ mkoid CE_BASIC_CONSTRAINTS=2.5.29.19
//! pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);
//! ```

use std::env;
use bcx509::Oid;

fn process_one(arg: &str) -> Result<String, String> {
    let (name, dotted) = match arg.split_once('=') {
        Some((name, dotted)) => (Some(name), dotted),
        None => (None, arg)
    };
    let oid: Oid = dotted.parse().map_err(|err| format!("{}", err))?;
    let content = oid.as_slice().iter().map(|octet| {
        octet.to_string()
    }).collect::<Vec<_>>().join(", ");
    Ok(match name {
        Some(name) => {
            format!("pub const {}: ConstOid = Oid(&[{}]);", name, content)
        }
        None => format!("[{}]", content)
    })
}

fn main() {
    for arg in env::args().skip(1) {
        match process_one(&arg) {
            Ok(line) => println!("{}", line),
            Err(err) => eprintln!("{}: {}.", arg, err),
        }
    }
}
