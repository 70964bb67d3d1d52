/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use stoat::Engine;

fn main() {
    if let Err(e) = Engine::new().run() {
        eprintln!(
            "{} encountered a fatal error: {e}",
            env!("CARGO_PKG_NAME")
        );
        std::process::exit(1);
    }
}
