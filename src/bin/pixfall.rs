use pixfall::{
    AcquireConfig, Env, GenerationRequest, ImageAcquirer, ImageModel, Orientation,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let usage = concat!(
        "usage: pixfall --prompt TEXT [--model MODEL] [--width N] [--height N]\n",
        "       pixfall --stock QUERY [--orientation landscape|portrait]\n",
        "       common: [--dotenv PATH]\n",
        "\n",
        "MODEL is a Together FLUX id or a short alias (flux-schnell, flux-pro, ...).\n",
        "Credentials are read from TOGETHER_AI_API_KEY, FLUX_API_KEY and\n",
        "UNSPLASH_ACCESS_KEY; with none set the key-free generator is used.\n",
    );

    let mut prompt: Option<String> = None;
    let mut stock_query: Option<String> = None;
    let mut model: Option<ImageModel> = None;
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut orientation = Orientation::Landscape;
    let mut dotenv_path: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prompt" => prompt = Some(args.next().ok_or("missing value for --prompt")?),
            "--stock" => stock_query = Some(args.next().ok_or("missing value for --stock")?),
            "--model" => {
                model = Some(args.next().ok_or("missing value for --model")?.parse()?);
            }
            "--width" => width = Some(args.next().ok_or("missing value for --width")?.parse()?),
            "--height" => {
                height = Some(args.next().ok_or("missing value for --height")?.parse()?);
            }
            "--orientation" => {
                orientation = match args
                    .next()
                    .ok_or("missing value for --orientation")?
                    .as_str()
                {
                    "landscape" => Orientation::Landscape,
                    "portrait" => Orientation::Portrait,
                    other => return Err(format!("unknown orientation: {other}").into()),
                };
            }
            "--dotenv" => dotenv_path = Some(args.next().ok_or("missing value for --dotenv")?),
            "--help" | "-h" => {
                println!("{usage}");
                return Ok(());
            }
            other => return Err(format!("unknown arg: {other}\n\n{usage}").into()),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let env = match dotenv_path {
        Some(path) => Env::parse_dotenv(&std::fs::read_to_string(path)?),
        None => Env::default(),
    };
    let acquirer = ImageAcquirer::new(AcquireConfig::from_env(&env));

    let outcome = match (prompt, stock_query) {
        (Some(prompt), None) => {
            let mut request =
                GenerationRequest::new(prompt)?.with_model(model.unwrap_or_default());
            if let (Some(width), Some(height)) = (width, height) {
                request = request.with_size(width, height)?;
            }
            pixfall::GenerationOutcome::from_result(acquirer.acquire(&request).await)
        }
        (None, Some(query)) => acquirer.stock_image(&query, orientation).await,
        _ => return Err(format!("pass exactly one of --prompt or --stock\n\n{usage}").into()),
    };

    match (outcome.image_url, outcome.error_message) {
        (Some(url), _) => {
            println!("{url}");
            Ok(())
        }
        (None, message) => {
            Err(message.unwrap_or_else(|| "failed to acquire an image".to_string()).into())
        }
    }
}
