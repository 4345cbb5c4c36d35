use anyhow::Result;
use ossign_aliyun_oss::{Config, Credential};
use ossign_core::Context;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Region, signature version and additional headers come from env:
    // ALIBABA_CLOUD_OSS_REGION, ALIBABA_CLOUD_OSS_SIGNATURE_VERSION, ...
    let config = Config {
        region: Some("cn-hangzhou".to_string()),
        ..Default::default()
    }
    .from_env(&Context::new())?;

    let cred = Credential::new(
        &std::env::var("ALIBABA_CLOUD_ACCESS_KEY_ID").unwrap_or_else(|_| "access_key_id".into()),
        &std::env::var("ALIBABA_CLOUD_ACCESS_KEY_SECRET")
            .unwrap_or_else(|_| "access_key_secret".into()),
    );

    let bucket = "my-bucket"; // Replace with your bucket name
    let key = "path/to/object.txt";
    let region = config.region.clone().unwrap_or_default();
    let url = format!("https://{bucket}.oss-{region}.aliyuncs.com/{key}");

    // Presigned url for a GET
    let (mut parts, _) = http::Request::get(&url).body(())?.into_parts();
    let mut ctx = config
        .signing_context(&cred, &mut parts)
        .with_bucket(bucket)
        .with_key(key)
        .with_auth_method_query();
    config.signer().sign(Some(&mut ctx))?;
    drop(ctx);
    println!("presigned url ({:?}): {}", config.version(), parts.uri);

    // Header signed PUT
    let (mut parts, _) = http::Request::put(&url)
        .header("content-type", "text/plain")
        .body(())?
        .into_parts();
    let mut ctx = config
        .signing_context(&cred, &mut parts)
        .with_bucket(bucket)
        .with_key(key);
    config.signer().sign(Some(&mut ctx))?;
    drop(ctx);
    for (name, value) in parts.headers.iter() {
        println!("{name}: {value:?}");
    }

    Ok(())
}
