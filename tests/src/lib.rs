//! End-to-end tests that run the library crates against loopback stand-ins
//! for real cameras.


#[cfg(test)]
mod discovery {
    mod integration;
}

#[cfg(test)]
mod client {
    mod integration;
}

#[cfg(test)]
mod inventory {
    mod integration;
}
