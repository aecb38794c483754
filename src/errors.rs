use thiserror::Error;

/// Erros possíveis durante a extração de transações de texto bancário
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Falha genérica durante o parsing do conteúdo (detalhe na mensagem)
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// Formato da entrada não foi reconhecido por nenhum parser
    #[error("Unrecognized input format")]
    UnrecognizedFormat,

    /// Erro ao ler o conteúdo do arquivo do disco
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// O builder foi chamado sem fornecer conteúdo nem caminho de arquivo
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    /// Entrada vazia ou composta apenas de espaços
    #[error("Input is empty")]
    EmptyInput,

    // ── Erros específicos de formatos ───────────────────────────────────────────

    /// Mensagem SMS curta demais para conter uma transação
    #[error("Message too short to contain a transaction")]
    MessageTooShort,

    /// Nenhum valor monetário pôde ser extraído da entrada
    #[error("Could not extract an amount")]
    AmountNotFound,

    /// Nenhuma data reconhecível foi encontrada na entrada
    #[error("Could not find a recognizable date")]
    DateNotFound,

    /// Não foi possível decidir entre receita e despesa
    #[error("Could not determine whether this is income or expense")]
    TypeUndetermined,

    /// O cabeçalho CSV não mapeia as colunas mínimas exigidas
    #[error("Missing required columns: {0}")]
    MissingRequiredColumns(String),
}

/// Alias conveniente para Result com nosso tipo de erro principal
pub type ExtractResult<T> = Result<T, ExtractError>;
