use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let out = crate_dir.join("include").join("todo_sync.h");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TODO_SYNC_H")
        .with_cpp_compat(true)
        .generate();

    match bindings {
        Ok(bindings) => {
            if let Err(err) = std::fs::create_dir_all(crate_dir.join("include")) {
                println!("cargo:warning=could not create include dir: {err}");
                return;
            }
            bindings.write_to_file(out);
        }
        Err(err) => println!("cargo:warning=header generation skipped: {err}"),
    }
}
