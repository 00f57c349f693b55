fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point prost at the vendored protoc so builds do not require a
    // system-wide protobuf installation.
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    println!("cargo:rerun-if-changed=proto/depot.proto");

    tonic_build::configure()
        .build_client(false)
        .compile_protos(&["proto/depot.proto"], &["proto"])?;

    Ok(())
}
