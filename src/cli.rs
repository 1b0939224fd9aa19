//! Interface de linha de comando do agent-runner baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, list)
//! e flags globais (--config, --offline, --model, --verbose).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// agent-runner: puxa jobs vencidos da fila, gera, publica e registra o resultado.
#[derive(Debug, Parser)]
#[command(name = "agent-runner", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo TOML de configuração (padrão: ./agent-runner.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Usa o modelo stub determinístico e links placeholder em vez de
    /// chamar o provedor e publicar documentos.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Sobrescreve o identificador do modelo nesta execução.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Habilita logs em nível debug.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Processa todos os jobs enfileirados e vencidos.
    Run {
        /// Usa esta data como hoje (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the run summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Mostra os jobs vencidos sem alterar nada.
    List {
        /// Usa esta data como hoje (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}
