//! Thread MQTT que assina o tópico dos nós e envia frames para o loop
//! principal via channel.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use nodewatch_core::config::BrokerConfig;
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Pausa entre tentativas quando a conexão com o broker falha.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Capacidade da fila de requisições do cliente MQTT.
const REQUEST_CAPACITY: usize = 10;

/// Frame recebido do broker.
#[derive(Debug, Clone)]
pub struct FrameMessage {
    pub topic: String,
    pub payload: String,
    pub raw_size: usize,
}

/// Inicia a thread MQTT. Retorna o receiver do channel.
pub fn spawn_receiver_thread(cfg: &BrokerConfig) -> std::io::Result<Receiver<FrameMessage>> {
    let (tx, rx) = bounded::<FrameMessage>(cfg.channel_capacity);

    let client_id = format!("{}-{}", cfg.client_id_prefix, Uuid::new_v4());
    let mut options = MqttOptions::new(client_id, cfg.host.clone(), cfg.port);
    options.set_keep_alive(Duration::from_secs(cfg.keep_alive_secs));

    let (client, connection) = Client::new(options, REQUEST_CAPACITY);
    let topic = cfg.topic.clone();
    info!("Conectando em {}:{} – tópico {topic}", cfg.host, cfg.port);

    std::thread::Builder::new()
        .name("mqtt-receiver".into())
        .spawn(move || receiver_loop(&tx, &client, connection, &topic))?;

    Ok(rx)
}

fn receiver_loop(
    tx: &Sender<FrameMessage>,
    client: &Client,
    mut connection: Connection,
    topic: &str,
) {
    for notification in connection.iter() {
        match notification {
            // Assina a cada ConnAck: sessão limpa perde a assinatura ao reconectar
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Conectado ao broker, assinando {topic}");
                if let Err(e) = client.try_subscribe(topic, QoS::AtMostOnce) {
                    warn!("Falha ao assinar {topic}: {e}");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let raw_size = publish.payload.len();
                let payload = match String::from_utf8(publish.payload.to_vec()) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Payload não UTF-8 em {}: {e}", publish.topic);
                        continue;
                    }
                };

                let msg = FrameMessage {
                    topic: publish.topic,
                    payload,
                    raw_size,
                };
                // Non-blocking send: se o loop principal está lento, descarta o frame
                match tx.try_send(msg) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("Channel cheio, descartando frame"),
                    Err(TrySendError::Disconnected(_)) => {
                        info!("Loop principal encerrado, parando thread MQTT");
                        break;
                    }
                }
            }
            Ok(event) => {
                debug!("Evento MQTT: {event:?}");
            }
            Err(e) => {
                warn!("Erro na conexão MQTT: {e}. Tentando novamente em 2s...");
                std::thread::sleep(RETRY_DELAY);
            }
        }
    }

    if let Err(e) = client.disconnect() {
        debug!("Erro ao desconectar: {e}");
    }
}
